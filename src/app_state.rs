use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::analysis::AnalysisSession;
use crate::services::caption::CaptionClient;
use crate::services::comparison::ComparisonClient;
use crate::services::orchestrator::UploadOrchestrator;
use crate::services::similarity::SimilarityClient;

/// The orchestrator wired to the live HTTP clients.
pub type LiveOrchestrator = UploadOrchestrator<CaptionClient, SimilarityClient, ComparisonClient>;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<LiveOrchestrator>,
    pub sessions: Arc<RwLock<HashMap<Uuid, AnalysisSession>>>,
}

impl AppState {
    pub fn new(orchestrator: LiveOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}
