// src/api.rs
//! HTTP trigger surface: a scheduler (or a person) hits `/run` to start one cycle.

use std::sync::Arc;

use serde_json::{json, Value};
use shuttle_axum::axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use crate::error::PipelineError;
use crate::metrics::Metrics;
use crate::pipeline::{Pipeline, RunReport};

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
    // Overlapping triggers run one after the other.
    running: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            running: Arc::new(Mutex::new(())),
        }
    }
}

pub fn router(state: AppState, metrics: Option<&Metrics>) -> Router {
    let mut app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/run", get(run).post(run))
        .with_state(state);

    if let Some(m) = metrics {
        app = app.merge(m.router());
    }

    app.layer(CorsLayer::very_permissive())
}

async fn run(State(state): State<AppState>) -> Result<Json<RunReport>, (StatusCode, Json<Value>)> {
    let _guard = state.running.lock().await;
    match state.pipeline.run_cycle().await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            let status = match e {
                PipelineError::AllSourcesFailed { .. } => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(json!({ "error": e.to_string() }))))
        }
    }
}
