// ============================================================
// Layer 1 — HTTP Front-End
// ============================================================
// axum router over the two serving pipelines:
//
//   POST /api/predict  pima JSON     → {"risk_score": ...}
//   POST /api/assess   clinical JSON → form report + advisories
//   GET  /health       per-model readiness
//
// Every route gets permissive CORS (the browser front-end is
// served from another origin in development) and request
// tracing. When a static directory is configured it answers
// everything the API does not claim.

pub mod routes;

use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::application::pipeline::ServingPipeline;

/// Shared, read-only router state. Cloned per request (two Arc bumps).
#[derive(Clone)]
pub struct AppState {
    /// Clinical schema, form presentation
    pub form: Arc<ServingPipeline>,
    /// Pima schema, API presentation
    pub api:  Arc<ServingPipeline>,
}

pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route("/api/predict", post(routes::predict))
        .route("/api/assess", post(routes::assess))
        .route("/health", get(routes::health))
        .with_state(state);

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(CorsLayer::permissive()).layer(TraceLayer::new_for_http())
}
