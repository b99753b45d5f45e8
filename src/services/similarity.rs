use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::catalog::CatalogItem;

/// Finds catalog items visually similar to a captioned image.
#[async_trait]
pub trait SimilarityProvider: Send + Sync {
    async fn search(&self, caption: &str) -> Result<Vec<CatalogItem>, SimilarityError>;
}

/// Client for the similarity-search service.
pub struct SimilarityClient {
    http: Client,
    endpoint: String,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    caption: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<CatalogItem>,
}

impl SimilarityClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SimilarityProvider for SimilarityClient {
    async fn search(&self, caption: &str) -> Result<Vec<CatalogItem>, SimilarityError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&SearchRequest { caption })
            .send()
            .await
            .map_err(SimilarityError::Http)?;

        if !response.status().is_success() {
            return Err(SimilarityError::Status {
                status: response.status().as_u16(),
            });
        }

        let body: SearchResponse = response.json().await.map_err(SimilarityError::Http)?;
        Ok(body.results)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SimilarityError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("similarity-search service returned HTTP {status}")]
    Status { status: u16 },
}
