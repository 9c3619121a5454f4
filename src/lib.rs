pub mod api;
pub mod auth;
pub mod card;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod report;
pub mod store;

pub use card::{RawCard, ReducedCard};
pub use config::FetchConfig;
pub use error::{FetchError, PageFailure};
pub use fetcher::{FetchSummary, Fetcher};
pub use report::{ConsoleReporter, FetchEvent, Reporter};
