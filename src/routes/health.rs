use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::app_state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub active_sessions: usize,
}

/// GET /health — liveness plus a count of in-memory analysis sessions.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let active_sessions = state.sessions.read().await.len();

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions,
    })
}
