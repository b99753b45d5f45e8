use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::catalog::MatchResult;

/// Status of one upload analysis session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// In-memory record of one upload analysis, from submission to result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSession {
    pub id: Uuid,
    pub status: AnalysisStatus,
    pub progress: f32,
    pub caption: Option<String>,
    pub results: Option<Vec<MatchResult>>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AnalysisSession {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            status: AnalysisStatus::Pending,
            progress: 0.0,
            caption: None,
            results: None,
            error: None,
            created_at: Utc::now(),
        }
    }
}

/// Response after submitting an image for analysis.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    pub status: AnalysisStatus,
    pub message: String,
}

/// Response for querying an analysis session.
#[derive(Debug, Serialize)]
pub struct AnalysisStatusResponse {
    pub analysis_id: Uuid,
    pub status: AnalysisStatus,
    pub progress: f32,
    pub caption: Option<String>,
    pub results: Option<Vec<MatchResult>>,
    pub error: Option<String>,
}
