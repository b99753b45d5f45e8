use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000"). Unused by the scraper binary.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Captioning service endpoint
    pub caption_api_url: String,

    /// Similarity-search service endpoint
    pub search_api_url: String,

    /// Pairwise image-comparison service endpoint
    pub comparison_api_url: String,

    /// extract.pics API base URL
    #[serde(default = "default_extraction_api_url")]
    pub extraction_api_url: String,

    /// extract.pics bearer token
    pub extraction_api_key: String,

    /// Marketplace entry page for the catalog scraper
    #[serde(default = "default_marketplace_url")]
    pub marketplace_url: String,

    /// CSS selector for the marketplace's primary search input
    #[serde(default = "default_search_input_selector")]
    pub search_input_selector: String,

    /// CSS selector matching product anchors on the results page
    #[serde(default = "default_listing_selector")]
    pub listing_selector: String,

    /// How many listings to take from the results page
    #[serde(default = "default_max_listings")]
    pub max_listings: usize,

    /// Fixed interval between extraction status polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Poll attempt budget before an extraction job is declared timed out
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,

    /// Concurrency cap for per-listing image resolution
    #[serde(default = "default_resolve_concurrency")]
    pub resolve_concurrency: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_extraction_api_url() -> String {
    "https://api.extract.pics/v0".to_string()
}

fn default_marketplace_url() -> String {
    "https://www.depop.com/".to_string()
}

fn default_search_input_selector() -> String {
    "input[type='search']".to_string()
}

fn default_listing_selector() -> String {
    "a[href*='/products/']".to_string()
}

fn default_max_listings() -> usize {
    10
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_poll_max_attempts() -> u32 {
    30
}

fn default_resolve_concurrency() -> usize {
    4
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}
