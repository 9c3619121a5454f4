use std::error::Error;
use tcg_fetch::{ConsoleReporter, FetchConfig, Fetcher};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = FetchConfig::from_env()?;
    let fetcher = Fetcher::new(config, ConsoleReporter::new())?;
    fetcher.run().await?;

    Ok(())
}
