use crate::api;
use crate::auth::get_auth_headers;
use crate::card::{RawCard, ReducedCard};
use crate::config::FetchConfig;
use crate::error::{FetchError, PageFailure};
use crate::report::{FetchEvent, Reporter};
use crate::store::{Accumulator, PriorState};
use reqwest::Client;
use tokio::time::sleep;

/// Two empty pages in a row mean the collection is exhausted.
const EMPTY_PAGES_TO_STOP: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    pub start_page: u32,
    pub last_page: u32,
    pub total: usize,
    pub added: usize,
    pub skipped_pages: Vec<u32>,
}

pub struct Fetcher<R> {
    client: Client,
    config: FetchConfig,
    reporter: R,
}

impl<R: Reporter> Fetcher<R> {
    pub fn new(config: FetchConfig, reporter: R) -> Result<Self, FetchError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(get_auth_headers(config.api_key.as_deref())?)
            .build()?;
        Ok(Fetcher {
            client,
            config,
            reporter,
        })
    }

    /// Reads whatever a previous run left at the output path. Anything
    /// unreadable is reported and ignored.
    pub fn load_prior_state(&self) -> Accumulator {
        let path = &self.config.output_path;
        match Accumulator::load(path) {
            PriorState::Missing => Accumulator::new(),
            PriorState::Loaded(accumulator) => {
                self.reporter.report(&FetchEvent::Resumed {
                    existing: accumulator.len(),
                    path: path.clone(),
                });
                accumulator
            }
            PriorState::Unreadable(reason) => {
                self.reporter.report(&FetchEvent::ResumeFailed {
                    path: path.clone(),
                    reason,
                });
                Accumulator::new()
            }
        }
    }

    pub async fn fetch_page(&self, page: u32) -> Result<Vec<RawCard>, PageFailure> {
        api::fetch_page_with_retry(&self.client, &self.config, page, &self.reporter).await
    }

    /// Runs until two consecutive empty pages. Only a failure to write the
    /// output file ends the run early.
    pub async fn run(&self) -> Result<FetchSummary, FetchError> {
        if self.config.api_key.is_none() {
            self.reporter.report(&FetchEvent::MissingApiKey);
        }

        let mut accumulator = self.load_prior_state();
        let start_page = accumulator.start_page(self.config.page_size);
        let mut summary = FetchSummary {
            start_page,
            last_page: start_page,
            total: accumulator.len(),
            added: 0,
            skipped_pages: Vec::new(),
        };
        let mut empty_pages_in_a_row = 0;
        let mut page = start_page;

        self.reporter.report(&FetchEvent::Started { start_page });
        loop {
            summary.last_page = page;
            self.reporter.report(&FetchEvent::PageRequested { page });

            match self.fetch_page(page).await {
                Err(failure) => {
                    self.reporter.report(&FetchEvent::PageSkipped { page, failure });
                    summary.skipped_pages.push(page);
                }
                Ok(cards) if cards.is_empty() => {
                    empty_pages_in_a_row += 1;
                    self.reporter.report(&FetchEvent::PageEmpty {
                        page,
                        consecutive: empty_pages_in_a_row,
                    });
                    if empty_pages_in_a_row >= EMPTY_PAGES_TO_STOP {
                        break;
                    }
                }
                Ok(cards) => {
                    empty_pages_in_a_row = 0;
                    let received = cards.len();
                    let added = accumulator.extend(cards.iter().filter_map(ReducedCard::reduce));
                    if added > 0 {
                        accumulator.save(&self.config.output_path)?;
                        summary.added += added;
                    }
                    self.reporter.report(&FetchEvent::PageStored {
                        page,
                        received,
                        added,
                        total: accumulator.len(),
                    });
                }
            }

            page += 1;
            sleep(self.config.inter_page_delay).await;
        }

        summary.total = accumulator.len();
        self.reporter.report(&FetchEvent::Finished {
            total: summary.total,
            path: self.config.output_path.clone(),
        });
        Ok(summary)
    }
}
