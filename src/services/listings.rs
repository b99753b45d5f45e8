//! Listing extraction from the rendered marketplace results page.
//!
//! Marketplace result grids are anchor tiles whose href is the product page
//! and whose text contains the price. Candidates missing either field are
//! rejected here, not by the scraper.

use garde::Validate;
use scraper::{Html, Selector};
use tracing::debug;

use crate::models::catalog::CatalogItem;

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("invalid listing selector {selector:?}")]
    InvalidSelector { selector: String },
}

/// Extract up to `limit` (url, price) listings from rendered HTML.
///
/// Relative hrefs are resolved against `base_url`; duplicate product URLs are
/// collapsed to the first occurrence so grid tiles with multiple anchors do
/// not inflate the page.
pub fn extract_listings(
    html: &str,
    base_url: &str,
    listing_selector: &str,
    limit: usize,
) -> Result<Vec<CatalogItem>, ListingError> {
    let anchor_sel = Selector::parse(listing_selector).map_err(|_| ListingError::InvalidSelector {
        selector: listing_selector.to_string(),
    })?;

    let document = Html::parse_document(html);
    let mut items: Vec<CatalogItem> = Vec::new();

    for anchor in document.select(&anchor_sel) {
        if items.len() >= limit {
            break;
        }

        let href = match anchor.value().attr("href") {
            Some(href) if !href.is_empty() => href,
            _ => continue,
        };
        let listing_url = absolute_url(base_url, href);

        if items.iter().any(|item| item.listing_url == listing_url) {
            continue;
        }

        let text: String = anchor.text().collect::<Vec<_>>().join(" ");
        let price = match price_from_text(&text) {
            Some(price) => price,
            None => {
                debug!(listing_url = %listing_url, "rejecting listing without a price");
                continue;
            }
        };

        let item = CatalogItem {
            listing_url,
            price,
            image_url: None,
        };
        if let Err(report) = item.validate() {
            debug!(listing_url = %item.listing_url, error = %report, "rejecting listing failing schema");
            continue;
        }
        items.push(item);
    }

    Ok(items)
}

/// First whitespace-separated token that looks like a price: a currency symbol
/// followed by at least one digit.
fn price_from_text(text: &str) -> Option<String> {
    text.split_whitespace()
        .find(|token| {
            token.starts_with(['£', '$', '€']) && token.chars().any(|c| c.is_ascii_digit())
        })
        .map(str::to_string)
}

fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), href.trim_start_matches('/'))
    }
}
