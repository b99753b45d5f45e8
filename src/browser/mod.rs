//! Headless browser session management for the catalog scraper.

use std::time::Duration;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("failed to configure headless browser: {0}")]
    Config(String),

    #[error("browser session failed: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),
}

/// Launch a headless browser and open the marketplace entry page.
///
/// The CDP event handler is spawned onto the runtime and exits when the
/// browser closes.
pub async fn launch(url: &str) -> Result<(Browser, Page), BrowserError> {
    let config = BrowserConfig::builder()
        .new_headless_mode()
        .args(vec!["--disable-gpu", "--no-sandbox", "--disable-dev-shm-usage"])
        .build()
        .map_err(BrowserError::Config)?;

    let (browser, mut handler) = Browser::launch(config).await?;
    debug!("headless browser launched");

    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    // Give the browser a moment to settle before opening the first page.
    sleep(Duration::from_millis(300)).await;

    let page = browser.new_page(url).await?;
    page.wait_for_navigation().await?;
    info!(url, "navigated to marketplace");

    Ok((browser, page))
}

/// Submit a query through the page's primary search input and wait for the
/// results page.
pub async fn submit_search(page: &Page, selector: &str, query: &str) -> Result<(), BrowserError> {
    let input = page.find_element(selector).await?;
    input.click().await?;
    input.type_str(query).await?;
    input.press_key("Enter").await?;
    page.wait_for_navigation().await?;
    info!(query, "search submitted");
    Ok(())
}
