use crate::error::PageFailure;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

/// Everything a run has to say about its progress.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent {
    MissingApiKey,
    Resumed { existing: usize, path: PathBuf },
    ResumeFailed { path: PathBuf, reason: String },
    Started { start_page: u32 },
    PageRequested { page: u32 },
    Retrying {
        page: u32,
        attempt: u32,
        failure: PageFailure,
        wait: Duration,
    },
    PageSkipped { page: u32, failure: PageFailure },
    PageEmpty { page: u32, consecutive: u32 },
    PageStored {
        page: u32,
        received: usize,
        added: usize,
        total: usize,
    },
    Finished { total: usize, path: PathBuf },
}

pub trait Reporter {
    fn report(&self, event: &FetchEvent);
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn report(&self, event: &FetchEvent) {
        (**self).report(event)
    }
}

/// Logs through `tracing` and keeps a spinner with the running card count.
pub struct ConsoleReporter {
    bar: ProgressBar,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} page {prefix}: {msg} [{elapsed}]") {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(120));
        ConsoleReporter { bar }
    }

    fn log(&self, event: &FetchEvent) {
        match event {
            FetchEvent::MissingApiKey => info!(
                "no {} in the environment, continuing without a key (requests may be rate limited)",
                crate::config::API_KEY_VAR
            ),
            FetchEvent::Resumed { existing, path } => {
                info!("resuming with {} cards already in {}", existing, path.display())
            }
            FetchEvent::ResumeFailed { path, reason } => {
                warn!("could not read {}: {}, starting from scratch", path.display(), reason)
            }
            FetchEvent::Started { start_page } => info!("starting download at page {}", start_page),
            FetchEvent::PageRequested { page } => info!("fetching page {}", page),
            FetchEvent::Retrying {
                page,
                attempt,
                failure,
                wait,
            } => warn!(
                "page {} attempt {} failed ({}), retrying in {:.1}s",
                page,
                attempt,
                failure,
                wait.as_secs_f64()
            ),
            FetchEvent::PageSkipped { page, failure } => {
                error!("skipping page {}: {}", page, failure)
            }
            FetchEvent::PageEmpty { page, consecutive } => {
                info!("page {} is empty ({} in a row)", page, consecutive)
            }
            FetchEvent::PageStored {
                page,
                received,
                added,
                total,
            } => info!(
                "page {}: {} cards received, {} new, {} total",
                page, received, added, total
            ),
            FetchEvent::Finished { total, path } => {
                info!("saved {} cards to {}", total, path.display())
            }
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: &FetchEvent) {
        self.bar.suspend(|| self.log(event));
        match event {
            FetchEvent::Resumed { existing, .. } => {
                self.bar.set_message(format!("{} cards", existing))
            }
            FetchEvent::PageRequested { page } => {
                self.bar.set_prefix(page.to_string());
            }
            FetchEvent::PageStored { total, .. } => self.bar.set_message(format!("{} cards", total)),
            FetchEvent::Finished { total, .. } => {
                self.bar.finish_with_message(format!("{} cards", total))
            }
            _ => {}
        }
    }
}
