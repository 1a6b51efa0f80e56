//! Session status for the page
//!
//! The page polls this until both startup phases settle, then again after
//! each analysis to refresh the busy flag.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use rse_common::{PhaseStatus, WorkflowState};

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub dataset: PhaseStatus,
    pub model: PhaseStatus,
    /// Both phases ready; the analyze control may be enabled
    pub ready: bool,
    /// User-facing reason analyze is unavailable, if it is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    pub workflow: WorkflowState,
    pub busy: bool,
    pub credential_saved: bool,
}

/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let session = &state.session;

    Json(StatusResponse {
        session_id: session.id(),
        started_at: session.started_at(),
        dataset: session.dataset_status(),
        model: session.model_status(),
        ready: session.is_ready(),
        message: state.controller.readiness_error(),
        review_count: session.corpus().map(|corpus| corpus.len()),
        classifier: session.classifier().map(|c| c.name().to_string()),
        workflow: state.controller.state(),
        busy: state.controller.is_busy(),
        credential_saved: session.credential().is_set(),
    })
}
