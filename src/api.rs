use crate::card::{PageResponse, RawCard};
use crate::config::FetchConfig;
use crate::error::PageFailure;
use crate::report::{FetchEvent, Reporter};
use reqwest::{Client, StatusCode};
use tokio::time::sleep;

/// One GET against the collection endpoint, no retries.
pub async fn fetch_cards_page(
    client: &Client,
    base_url: &str,
    page: u32,
    page_size: u32,
) -> Result<Vec<RawCard>, PageFailure> {
    let response = client
        .get(base_url)
        .query(&[("page", page), ("pageSize", page_size)])
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if status != StatusCode::OK {
        return Err(PageFailure::from_status(status.as_u16(), &body));
    }

    let page: PageResponse = serde_json::from_str(&body).map_err(|e| PageFailure::Hard {
        status: Some(status.as_u16()),
        reason: format!("unexpected response body: {}", e),
    })?;
    Ok(page.into_cards())
}

/// Fetches a page, retrying transient failures with linear backoff.
/// Every failure that comes out of here is final for the page.
pub async fn fetch_page_with_retry<R: Reporter>(
    client: &Client,
    config: &FetchConfig,
    page: u32,
    reporter: &R,
) -> Result<Vec<RawCard>, PageFailure> {
    let mut attempts = 0;
    loop {
        attempts += 1;
        match fetch_cards_page(client, &config.base_url, page, config.page_size).await {
            Ok(cards) => return Ok(cards),
            Err(failure) if !failure.is_transient() => return Err(failure),
            Err(failure) if attempts >= config.max_attempts => {
                return Err(PageFailure::Exhausted {
                    attempts,
                    last: Box::new(failure),
                })
            }
            Err(failure) => {
                let wait = config.backoff_base * attempts;
                reporter.report(&FetchEvent::Retrying {
                    page,
                    attempt: attempts,
                    failure,
                    wait,
                });
                sleep(wait).await;
            }
        }
    }
}
