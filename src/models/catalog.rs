use garde::Validate;
use serde::{Deserialize, Serialize};

/// A product listing taken from the marketplace search results.
///
/// `listing_url` and `price` are always present; `image_url` is populated only
/// when image extraction found a recognized raster format for the listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CatalogItem {
    #[garde(length(min = 1, max = 2048))]
    pub listing_url: String,

    #[garde(length(min = 1, max = 64))]
    pub price: String,

    #[garde(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Fields returned by the pairwise comparison service for one candidate image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOutcome {
    pub similarity_score: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// A catalog item, optionally enriched with comparison fields.
///
/// Enrichment is best-effort: an item without an image URL is never compared,
/// and a failed comparison leaves the plain item shape untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub item: CatalogItem,

    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonOutcome>,
}

impl MatchResult {
    pub fn plain(item: CatalogItem) -> Self {
        Self {
            item,
            comparison: None,
        }
    }

    pub fn enriched(item: CatalogItem, comparison: ComparisonOutcome) -> Self {
        Self {
            item,
            comparison: Some(comparison),
        }
    }

    pub fn is_enriched(&self) -> bool {
        self.comparison.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(url: &str) -> CatalogItem {
        CatalogItem {
            listing_url: url.to_string(),
            price: "£10.00".to_string(),
            image_url: Some(format!("{url}/photo.jpg")),
        }
    }

    #[test]
    fn match_result_serializes_flat() {
        let result = MatchResult::enriched(
            item("https://example.com/products/a"),
            ComparisonOutcome {
                similarity_score: 0.87,
                summary: None,
            },
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["listing_url"], "https://example.com/products/a");
        assert_eq!(json["similarity_score"], 0.87);
        assert!(json.get("comparison").is_none());
    }

    #[test]
    fn plain_item_omits_comparison_fields() {
        let result = MatchResult::plain(CatalogItem {
            listing_url: "https://example.com/products/b".to_string(),
            price: "£28.00".to_string(),
            image_url: None,
        });

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("similarity_score").is_none());
        assert!(json.get("image_url").is_none());
    }
}
