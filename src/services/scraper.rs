use std::time::Duration;

use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::browser::{self, BrowserError};
use crate::config::AppConfig;
use crate::models::catalog::CatalogItem;
use crate::models::extraction::ExtractionStatus;
use crate::services::extraction::{self, ExtractionError, ExtractionProvider};
use crate::services::listings::{self, ListingError};

/// Fatal errors for a scrape run.
///
/// A failed navigation or search aborts the run: continuing would only produce
/// empty or stale listings. Per-listing image-resolution failures never reach
/// this type.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("browser step failed: {0}")]
    Browser(#[from] BrowserError),

    #[error("listing extraction failed: {0}")]
    Listings(#[from] ListingError),
}

/// Marketplace catalog scraper: navigate, search, extract listings, resolve a
/// product image per listing.
pub struct CatalogScraper<'a, E> {
    config: &'a AppConfig,
    extraction: &'a E,
}

impl<'a, E> CatalogScraper<'a, E>
where
    E: ExtractionProvider,
{
    pub fn new(config: &'a AppConfig, extraction: &'a E) -> Self {
        Self { config, extraction }
    }

    /// Run the full scrape for one search term.
    ///
    /// The returned list preserves results-page order; every listing appears
    /// exactly once regardless of how its image resolution fared.
    pub async fn scrape(&self, search_term: &str) -> Result<Vec<CatalogItem>, ScrapeError> {
        let (mut chromium, page) = browser::launch(&self.config.marketplace_url).await?;

        let outcome = self.scrape_with_page(&page, search_term).await;

        if let Err(e) = chromium.close().await {
            warn!(error = %e, "failed to close browser cleanly");
        }

        outcome
    }

    async fn scrape_with_page(
        &self,
        page: &chromiumoxide::Page,
        search_term: &str,
    ) -> Result<Vec<CatalogItem>, ScrapeError> {
        browser::submit_search(page, &self.config.search_input_selector, search_term).await?;

        let html = page.content().await.map_err(BrowserError::Cdp)?;
        let items = listings::extract_listings(
            &html,
            &self.config.marketplace_url,
            &self.config.listing_selector,
            self.config.max_listings,
        )?;
        info!(count = items.len(), search_term, "extracted listings");
        metrics::counter!("listings_scraped_total").increment(items.len() as u64);

        Ok(self.resolve_images(items).await)
    }

    /// Resolve a product image per listing with a bounded, order-preserving
    /// fan-out. Each listing's failures are isolated to that listing.
    pub async fn resolve_images(&self, items: Vec<CatalogItem>) -> Vec<CatalogItem> {
        let interval = Duration::from_millis(self.config.poll_interval_ms);
        let concurrency = self.config.resolve_concurrency.max(1);

        futures::stream::iter(items.into_iter().map(|item| async move {
            let image_url = self.resolve_one(&item.listing_url, interval).await;
            CatalogItem { image_url, ..item }
        }))
        .buffered(concurrency)
        .collect()
        .await
    }

    /// Best-effort resolution for one listing; every failure degrades to an
    /// absent image.
    async fn resolve_one(&self, listing_url: &str, interval: Duration) -> Option<String> {
        match self.try_resolve(listing_url, interval).await {
            Ok(found) => found,
            Err(e) => {
                metrics::counter!("image_resolutions_failed_total").increment(1);
                warn!(listing_url = %listing_url, error = %e, "image resolution failed");
                None
            }
        }
    }

    async fn try_resolve(
        &self,
        listing_url: &str,
        interval: Duration,
    ) -> Result<Option<String>, ExtractionError> {
        let job = self.extraction.start(listing_url).await?;
        debug!(listing_url, job_id = %job.id, "extraction started");

        let finished = extraction::await_completion(
            self.extraction,
            &job.id,
            interval,
            self.config.poll_max_attempts,
        )
        .await?;

        if finished.parsed_status() == ExtractionStatus::Error {
            warn!(listing_url, job_id = %finished.id, "extraction job ended in error");
            return Ok(None);
        }

        Ok(extraction::first_raster_image(&finished))
    }
}
