use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::catalog::ComparisonOutcome;

/// Scores visual similarity between the uploaded image and one candidate.
#[async_trait]
pub trait ComparisonProvider: Send + Sync {
    async fn compare(
        &self,
        target_image: &str,
        found_image: &str,
    ) -> Result<ComparisonOutcome, ComparisonError>;
}

/// Client for the pairwise comparison service.
pub struct ComparisonClient {
    http: Client,
    endpoint: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareRequest<'a> {
    target_image_path: &'a str,
    found_image_path: &'a str,
}

#[derive(Deserialize)]
struct CompareResponse {
    result: ComparisonOutcome,
}

impl ComparisonClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ComparisonProvider for ComparisonClient {
    async fn compare(
        &self,
        target_image: &str,
        found_image: &str,
    ) -> Result<ComparisonOutcome, ComparisonError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&CompareRequest {
                target_image_path: target_image,
                found_image_path: found_image,
            })
            .send()
            .await
            .map_err(ComparisonError::Http)?;

        if !response.status().is_success() {
            return Err(ComparisonError::Status {
                status: response.status().as_u16(),
            });
        }

        let body: CompareResponse = response.json().await.map_err(ComparisonError::Http)?;
        Ok(body.result)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ComparisonError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("comparison service returned HTTP {status}")]
    Status { status: u16 },
}
