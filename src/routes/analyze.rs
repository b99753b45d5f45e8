use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use base64::Engine;
use tracing::{error, info};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::models::analysis::{
    AnalysisSession, AnalysisStatus, AnalysisStatusResponse, AnalyzeResponse,
};
use crate::services::progress::ProgressReporter;

/// POST /api/v1/analyze — upload an image and start the matching pipeline.
pub async fn submit_analysis(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, StatusCode> {
    let mut image_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        if field.name() == Some("image") {
            let data = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;

            // Validate image format using the `image` crate
            image::guess_format(&data).map_err(|_| StatusCode::UNSUPPORTED_MEDIA_TYPE)?;

            image_data = Some(data.to_vec());
        }
    }

    let image_data = image_data.ok_or(StatusCode::BAD_REQUEST)?;
    let base64_image = base64::engine::general_purpose::STANDARD.encode(&image_data);

    let analysis_id = Uuid::new_v4();
    state
        .sessions
        .write()
        .await
        .insert(analysis_id, AnalysisSession::new(analysis_id));
    metrics::counter!("analyses_submitted_total").increment(1);
    info!(analysis_id = %analysis_id, bytes = image_data.len(), "analysis accepted");

    tokio::spawn(run_pipeline(state, analysis_id, base64_image));

    Ok(Json(AnalyzeResponse {
        analysis_id,
        status: AnalysisStatus::Pending,
        message: "image accepted for analysis".to_string(),
    }))
}

/// GET /api/v1/analyze/{analysis_id} — poll an analysis session.
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<Uuid>,
) -> Result<Json<AnalysisStatusResponse>, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&analysis_id).ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(AnalysisStatusResponse {
        analysis_id,
        status: session.status,
        progress: session.progress,
        caption: session.caption.clone(),
        results: session.results.clone(),
        error: session.error.clone(),
    }))
}

/// Drive the three-stage pipeline for one session, mirroring cosmetic
/// progress into the session record while it runs.
async fn run_pipeline(state: AppState, analysis_id: Uuid, base64_image: String) {
    if let Some(session) = state.sessions.write().await.get_mut(&analysis_id) {
        session.status = AnalysisStatus::Processing;
    }

    let (reporter, mut progress_rx) = ProgressReporter::start();
    let mirror_state = state.clone();
    let mirror = tokio::spawn(async move {
        while progress_rx.changed().await.is_ok() {
            let value = *progress_rx.borrow();
            if let Some(session) = mirror_state.sessions.write().await.get_mut(&analysis_id) {
                session.progress = value;
            }
        }
    });

    let started = std::time::Instant::now();
    let outcome = state.orchestrator.process(&base64_image).await;
    metrics::histogram!("analysis_duration_seconds").record(started.elapsed().as_secs_f64());

    match outcome {
        Ok(outcome) => {
            reporter.complete();
            metrics::counter!("analyses_completed_total").increment(1);
            info!(
                analysis_id = %analysis_id,
                matches = outcome.matches.len(),
                "analysis completed"
            );

            if let Some(session) = state.sessions.write().await.get_mut(&analysis_id) {
                session.status = AnalysisStatus::Completed;
                session.progress = 100.0;
                session.caption = Some(outcome.caption);
                session.results = Some(outcome.matches);
            }
        }
        Err(e) => {
            reporter.halt();
            metrics::counter!("analyses_failed_total").increment(1);
            error!(analysis_id = %analysis_id, error = %e, "analysis failed");

            if let Some(session) = state.sessions.write().await.get_mut(&analysis_id) {
                session.status = AnalysisStatus::Failed;
                session.error = Some(e.to_string());
            }
        }
    }

    drop(reporter);
    let _ = mirror.await;
}
