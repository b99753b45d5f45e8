use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tokio::time::sleep;
use tracing::debug;

use crate::models::extraction::{ExtractionEnvelope, ExtractionJob, ExtractionStatus};

/// URL suffixes accepted as product images.
const RASTER_EXTENSIONS: [&str; 4] = [".jpeg", ".jpg", ".gif", ".png"];

/// The extract.pics asynchronous image-extraction API.
#[async_trait]
pub trait ExtractionProvider: Send + Sync {
    /// Start an extraction job for the given page URL.
    async fn start(&self, url: &str) -> Result<ExtractionJob, ExtractionError>;

    /// Fetch the current state of a job.
    async fn poll(&self, id: &str) -> Result<ExtractionJob, ExtractionError>;
}

/// HTTP client for extract.pics.
pub struct ExtractPicsClient {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct StartRequest<'a> {
    url: &'a str,
}

impl ExtractPicsClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ExtractionProvider for ExtractPicsClient {
    async fn start(&self, url: &str) -> Result<ExtractionJob, ExtractionError> {
        let response = self
            .http
            .post(format!("{}/extractions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&StartRequest { url })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExtractionError::Api {
                status: response.status().as_u16(),
            });
        }

        let envelope: ExtractionEnvelope = response.json().await?;
        Ok(envelope.data)
    }

    async fn poll(&self, id: &str) -> Result<ExtractionJob, ExtractionError> {
        let response = self
            .http
            .get(format!("{}/extractions/{}", self.base_url, id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExtractionError::Api {
                status: response.status().as_u16(),
            });
        }

        let envelope: ExtractionEnvelope = response.json().await?;
        Ok(envelope.data)
    }
}

/// Poll a job at a fixed interval until it reaches a terminal status or the
/// attempt budget runs out.
pub async fn await_completion<E>(
    provider: &E,
    job_id: &str,
    interval: Duration,
    max_attempts: u32,
) -> Result<ExtractionJob, ExtractionError>
where
    E: ExtractionProvider + ?Sized,
{
    for attempt in 1..=max_attempts {
        sleep(interval).await;
        let job = provider.poll(job_id).await?;
        match job.parsed_status() {
            ExtractionStatus::Done | ExtractionStatus::Error => {
                debug!(job_id, attempt, status = %job.status, "extraction reached terminal status");
                return Ok(job);
            }
            ExtractionStatus::Pending => {}
        }
    }

    Err(ExtractionError::Timeout {
        attempts: max_attempts,
    })
}

/// First image whose URL ends in a recognized raster extension.
pub fn first_raster_image(job: &ExtractionJob) -> Option<String> {
    job.images
        .iter()
        .map(|image| &image.url)
        .find(|url| {
            let lower = url.to_ascii_lowercase();
            RASTER_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
        })
        .cloned()
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("extraction API returned HTTP {status}")]
    Api { status: u16 },

    #[error("extraction job did not finish within {attempts} polls")]
    Timeout { attempts: u32 },
}
