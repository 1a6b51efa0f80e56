//! Credential settings API
//!
//! Stores the optional classifier token entered on the page. A blank token
//! clears the saved value.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::error;

use rse_common::credential::Persistence;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialRequest {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct CredentialResponse {
    /// A token is now in effect
    pub saved: bool,
    /// The change reached the config file
    pub persisted: bool,
}

/// POST /api/settings/credential
///
/// The config write runs on a blocking thread.
pub async fn save_credential(
    State(state): State<AppState>,
    Json(request): Json<CredentialRequest>,
) -> ApiResult<Json<CredentialResponse>> {
    let credential = state.session.credential().clone();

    let (saved, persistence) = tokio::task::spawn_blocking(move || {
        let persistence = credential.set(&request.token);
        (credential.is_set(), persistence)
    })
    .await
    .map_err(|e| {
        error!("Credential update task failed: {}", e);
        ApiError::Internal(e.to_string())
    })?;

    Ok(Json(CredentialResponse {
        saved,
        persisted: persistence == Persistence::Persisted,
    }))
}
