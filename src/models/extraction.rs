use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle states of an extract.pics extraction job.
///
/// A job is created pending, mutated only by polling, and terminal at
/// `Done` or `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Pending,
    Done,
    Error,
}

/// One image discovered by an extraction job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedImage {
    pub url: String,
    pub id: String,
}

/// An asynchronous image-extraction job as reported by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionJob {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub images: Vec<ExtractedImage>,
}

impl ExtractionJob {
    /// The API occasionally reports intermediate states beyond the documented
    /// set; anything unrecognized is treated as still in flight.
    pub fn parsed_status(&self) -> ExtractionStatus {
        self.status.parse().unwrap_or(ExtractionStatus::Pending)
    }
}

/// Envelope wrapper shared by the start and poll endpoints.
#[derive(Debug, Deserialize)]
pub struct ExtractionEnvelope {
    pub data: ExtractionJob,
}
