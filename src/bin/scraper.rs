use lookalike::{
    config::AppConfig,
    services::{extraction::ExtractPicsClient, scraper::CatalogScraper},
};
use tracing_subscriber::EnvFilter;

const DEFAULT_SEARCH_TERM: &str = "blue jacket";

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting catalog scraper");

    // Load configuration (fails fast on a missing extraction API key)
    let config = AppConfig::from_env().expect("Failed to load configuration");

    let search_term = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SEARCH_TERM.to_string());

    let extraction = ExtractPicsClient::new(&config.extraction_api_url, &config.extraction_api_key);
    let scraper = CatalogScraper::new(&config, &extraction);

    let started = std::time::Instant::now();
    match scraper.scrape(&search_term).await {
        Ok(items) => {
            let resolved = items.iter().filter(|i| i.image_url.is_some()).count();
            tracing::info!(
                search_term,
                count = items.len(),
                resolved,
                elapsed_s = started.elapsed().as_secs_f64(),
                "scrape complete"
            );

            let json = serde_json::to_string_pretty(&items).expect("listings serialize");
            println!("{json}");
        }
        Err(e) => {
            tracing::error!(search_term, error = %e, "scrape failed");
            std::process::exit(1);
        }
    }
}
