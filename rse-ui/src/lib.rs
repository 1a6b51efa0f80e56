//! rse-ui library - Review Sentiment Explorer web front
//!
//! Serves the single-page UI and the JSON API driving one analysis
//! session per process.

use axum::Router;
use rse_common::{Session, WorkflowController};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Session context (corpus, classifier, phase status, credential)
    pub session: Arc<Session>,
    /// Single-flight analysis controller bound to `session`
    pub controller: Arc<WorkflowController>,
}

impl AppState {
    pub fn new(controller: Arc<WorkflowController>) -> Self {
        Self {
            session: Arc::clone(controller.session()),
            controller,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/api/analyze", post(api::analyze))
        .route("/api/status", get(api::get_status))
        .route("/api/settings/credential", post(api::save_credential));

    let public = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .merge(api::health_routes());

    Router::new()
        .merge(api)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
