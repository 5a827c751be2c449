/*!
 * HTTP surface of the service.
 *
 * - `GET /?content=<text>` runs the pipeline and always answers 200
 * - `GET /health` probes the classifier and answers 503 when it is unusable
 */

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::providers::Provider;
use crate::providers::ollama::Ollama;
use crate::translation::{PipelineResult, TranslationPipeline};

/// State shared by all handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub pipeline: TranslationPipeline,
    /// Known-English text sent to the classifier by the liveness check
    pub health_probe: String,
}

impl AppState {
    pub fn new(pipeline: TranslationPipeline, health_probe: impl Into<String>) -> Self {
        Self { pipeline, health_probe: health_probe.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(TranslationPipeline::from_config(config), config.pipeline.health_probe.clone())
    }
}

/// Query parameters of the translate endpoint
#[derive(Debug, Deserialize)]
pub struct TranslateQuery {
    #[serde(default)]
    pub content: Option<String>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(translate))
        .route("/health", get(health_check))
        .with_state(state)
}

async fn translate(
    State(state): State<AppState>,
    Query(query): Query<TranslateQuery>,
) -> Json<PipelineResult> {
    let content = query.content.unwrap_or_default();
    debug!("Translate request with {} characters", content.chars().count());
    Json(state.pipeline.process(&content).await)
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.pipeline.probe(&state.health_probe).await {
        Ok(label) => {
            if !label.is_english() {
                warn!("Health probe was classified as {}, expected English", label);
            }
            (StatusCode::OK, Json(json!({
                "status": "healthy",
                "ollama_connected": true
            })))
        }
        Err(e) => {
            warn!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({
                "status": "unhealthy",
                "ollama_connected": false
            })))
        }
    }
}

/// Validate `config`, bind the configured address and serve until Ctrl-C
pub async fn serve(config: &Config) -> Result<(), AppError> {
    config.validate().map_err(|e| AppError::Config(format!("{:#}", e)))?;

    // Startup continues without a backend; requests degrade to the fallback
    if let Err(e) = Ollama::from_config(&config.backend).test_connection().await {
        warn!("Ollama at {} is not reachable yet: {}", config.backend.backend_address, e);
    }

    let app = create_router(AppState::from_config(config));

    let host = config.server.host.as_str();
    let listener = tokio::net::TcpListener::bind((host, config.server.port)).await
        .map_err(|e| AppError::Server(format!("Failed to bind {}:{}: {}", host, config.server.port, e)))?;
    let addr = listener.local_addr()?;
    info!("Listening on {} (backend {}, model {})",
        addr, config.backend.backend_address, config.backend.model_name);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
