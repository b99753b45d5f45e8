use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Produces a caption for an uploaded image.
#[async_trait]
pub trait CaptionProvider: Send + Sync {
    async fn caption(&self, base64_image: &str) -> Result<String, CaptionError>;
}

/// Client for the captioning service.
pub struct CaptionClient {
    http: Client,
    endpoint: String,
}

#[derive(Serialize)]
struct CaptionRequest<'a> {
    base64_image: &'a str,
}

#[derive(Deserialize)]
struct CaptionResponse {
    caption: String,
}

impl CaptionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl CaptionProvider for CaptionClient {
    async fn caption(&self, base64_image: &str) -> Result<String, CaptionError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&CaptionRequest { base64_image })
            .send()
            .await
            .map_err(CaptionError::Http)?;

        if !response.status().is_success() {
            // Payload size in the error helps diagnose oversized uploads.
            return Err(CaptionError::Status {
                status: response.status().as_u16(),
                payload_chars: base64_image.len(),
            });
        }

        let body: CaptionResponse = response.json().await.map_err(CaptionError::Http)?;
        Ok(body.caption)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CaptionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("caption service returned HTTP {status} (payload was {payload_chars} base64 chars)")]
    Status { status: u16, payload_chars: usize },
}
