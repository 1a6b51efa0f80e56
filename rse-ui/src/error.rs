//! Error types for rse-ui

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rse_common::AnalyzeError;
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Analysis already running (409)
    #[error("{0}")]
    Conflict(String),

    /// Classifier call failed for this attempt (502)
    #[error("{0}")]
    BadGateway(String),

    /// Dataset or classifier not available (503)
    #[error("{0}")]
    NotReady(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<AnalyzeError> for ApiError {
    fn from(err: AnalyzeError) -> Self {
        let message = err.to_string();
        match err {
            AnalyzeError::NotReady(_) => ApiError::NotReady(message),
            AnalyzeError::Busy => ApiError::Conflict(message),
            AnalyzeError::Classification(_) => ApiError::BadGateway(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "BUSY"),
            ApiError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "CLASSIFICATION_FAILED"),
            ApiError::NotReady(_) => (StatusCode::SERVICE_UNAVAILABLE, "NOT_READY"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
