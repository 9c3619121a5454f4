use crate::error::FetchError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.pokemontcg.io/v2/cards";
pub const DEFAULT_OUTPUT_PATH: &str = "data/cards.json";
/// Largest `pageSize` the remote accepts.
pub const MAX_PAGE_SIZE: u32 = 250;

pub const API_KEY_VAR: &str = "POKEMON_API_KEY";
pub const BASE_URL_VAR: &str = "POKEMON_TCG_BASE_URL";
pub const PAGE_SIZE_VAR: &str = "POKEMON_TCG_PAGE_SIZE";
pub const OUTPUT_PATH_VAR: &str = "CARDS_OUTPUT_PATH";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub page_size: u32,
    pub output_path: PathBuf,
    pub api_key: Option<String>,
    pub max_attempts: u32,
    /// Retry `n` waits `backoff_base * n`.
    pub backoff_base: Duration,
    pub request_timeout: Duration,
    pub inter_page_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: MAX_PAGE_SIZE,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            api_key: None,
            max_attempts: 5,
            backoff_base: Duration::from_millis(1500),
            request_timeout: Duration::from_secs(30),
            inter_page_delay: Duration::from_millis(400),
        }
    }
}

impl FetchConfig {
    /// Reads `.env` and the process environment on top of the defaults.
    pub fn from_env() -> Result<Self, FetchError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, FetchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = FetchConfig::default();
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        config.api_key = read(API_KEY_VAR);
        if let Some(base_url) = read(BASE_URL_VAR) {
            config.base_url = base_url;
        }
        if let Some(page_size) = read(PAGE_SIZE_VAR) {
            config.page_size = page_size.parse().map_err(|_| {
                FetchError::Config(format!("{} must be an integer, got {:?}", PAGE_SIZE_VAR, page_size))
            })?;
        }
        if let Some(path) = read(OUTPUT_PATH_VAR) {
            config.output_path = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FetchError> {
        if self.base_url.trim().is_empty() {
            return Err(FetchError::Config("base_url must not be empty".to_string()));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(FetchError::Config(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        if self.max_attempts == 0 {
            return Err(FetchError::Config("max_attempts must be at least 1".to_string()));
        }
        Ok(())
    }
}
