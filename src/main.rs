use axum::response::Html;
use axum::{routing::get, routing::post, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use lookalike::app_state::AppState;
use lookalike::config::AppConfig;
use lookalike::routes;
use lookalike::services::caption::CaptionClient;
use lookalike::services::comparison::ComparisonClient;
use lookalike::services::orchestrator::UploadOrchestrator;
use lookalike::services::similarity::SimilarityClient;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing lookalike server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    // Register application metrics
    metrics::describe_counter!("analyses_submitted_total", "Total analyses submitted");
    metrics::describe_counter!("analyses_completed_total", "Total analyses completed");
    metrics::describe_counter!("analyses_failed_total", "Total analyses that failed");
    metrics::describe_counter!(
        "comparisons_failed_total",
        "Per-item comparison calls that failed and were absorbed"
    );
    metrics::describe_histogram!(
        "analysis_duration_seconds",
        "Time to run the full caption/search/comparison pipeline"
    );

    // Wire the external-service clients into the pipeline
    tracing::info!("Initializing external service clients");
    let orchestrator = UploadOrchestrator::new(
        CaptionClient::new(&config.caption_api_url),
        SimilarityClient::new(&config.search_api_url),
        ComparisonClient::new(&config.comparison_api_url),
    );

    // Create shared application state
    let state = AppState::new(orchestrator);

    // Build API routes
    let app = Router::new()
        // Static upload page (embedded at compile time)
        .route("/", get(|| async { Html(include_str!("../static/index.html")) }))
        // API endpoints
        .route("/health", get(routes::health::health_check))
        .route("/api/v1/analyze", post(routes::analyze::submit_analysis))
        .route(
            "/api/v1/analyze/{analysis_id}",
            get(routes::analyze::get_analysis),
        )
        .with_state(state)
        // Prometheus metrics endpoint (separate state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(10 * 1024 * 1024)); // 10 MB limit

    tracing::info!("Starting lookalike on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
