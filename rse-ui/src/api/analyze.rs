//! Analyze trigger
//!
//! One POST runs one analysis: select, classify, categorize. The work runs
//! on its own task so a dropped connection does not cut an analysis short.

use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::error;

use rse_common::AnalysisOutcome;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /api/analyze
///
/// 200 with the outcome, 409 while another analysis runs, 503 before the
/// session is ready, 502 when the classifier call fails.
pub async fn analyze(State(state): State<AppState>) -> ApiResult<Json<AnalysisOutcome>> {
    let controller = Arc::clone(&state.controller);

    let outcome = tokio::spawn(async move { controller.analyze().await })
        .await
        .map_err(|e| {
            error!("Analysis task failed: {}", e);
            ApiError::Internal(e.to_string())
        })??;

    Ok(Json(outcome))
}
