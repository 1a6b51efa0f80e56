//! Best-effort analysis event logging
//!
//! Every completed analysis produces one [`AnalysisEvent`]. It is handed to
//! a [`TelemetrySink`] on a detached task; the workflow never waits for the
//! delivery and never learns its outcome. Failures end up in the log only.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::categorizer::SentimentCategory;
use crate::config::TelemetryConfig;

/// Telemetry delivery errors (never surfaced to the user)
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Telemetry endpoint invalid: {0}")]
    InvalidEndpoint(String),

    #[error("Telemetry request failed: {0}")]
    Network(String),

    #[error("Telemetry endpoint returned HTTP {0}")]
    Status(u16),
}

/// Flat record of one completed analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisEvent {
    pub review_text: String,
    /// Category label text ("Positive", "Negative", "Neutral")
    pub sentiment_label: String,
    /// Raw model score
    pub confidence_score: f64,
    pub timestamp: DateTime<Utc>,
    pub session_id: Uuid,
}

impl AnalysisEvent {
    pub fn new(
        review_text: impl Into<String>,
        category: &SentimentCategory,
        timestamp: DateTime<Utc>,
        session_id: Uuid,
    ) -> Self {
        Self {
            review_text: review_text.into(),
            sentiment_label: category.label.to_string(),
            confidence_score: category.score,
            timestamp,
            session_id,
        }
    }
}

/// Destination for analysis events
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver one event, at most once
    async fn send(&self, event: &AnalysisEvent) -> Result<(), TelemetryError>;
}

/// Posts events as JSON to a remote logging endpoint
pub struct HttpTelemetrySink {
    http_client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpTelemetrySink {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, TelemetryError> {
        let endpoint = reqwest::Url::parse(endpoint)
            .map_err(|e| TelemetryError::InvalidEndpoint(format!("'{}': {}", endpoint, e)))?;

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TelemetryError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }
}

#[async_trait]
impl TelemetrySink for HttpTelemetrySink {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, event: &AnalysisEvent) -> Result<(), TelemetryError> {
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(event)
            .send()
            .await
            .map_err(|e| TelemetryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TelemetryError::Status(status.as_u16()));
        }

        Ok(())
    }
}

/// Discards every event; used when no endpoint is configured
#[derive(Debug, Default)]
pub struct NullTelemetrySink;

#[async_trait]
impl TelemetrySink for NullTelemetrySink {
    fn name(&self) -> &str {
        "null"
    }

    async fn send(&self, _event: &AnalysisEvent) -> Result<(), TelemetryError> {
        Ok(())
    }
}

/// Build the configured sink
///
/// An invalid endpoint disables telemetry with a warning instead of failing
/// startup.
pub fn build_sink(config: &TelemetryConfig) -> Arc<dyn TelemetrySink> {
    let Some(endpoint) = config.endpoint.as_deref() else {
        info!("Telemetry endpoint not configured, analysis events are not logged");
        return Arc::new(NullTelemetrySink);
    };

    match HttpTelemetrySink::new(endpoint, config.timeout()) {
        Ok(sink) => {
            info!(endpoint, "Telemetry sink ready");
            Arc::new(sink)
        }
        Err(e) => {
            warn!("Telemetry disabled: {}", e);
            Arc::new(NullTelemetrySink)
        }
    }
}

/// Fire-and-forget delivery on a detached task
///
/// Must be called from within a tokio runtime. No handle is returned.
pub fn dispatch(sink: Arc<dyn TelemetrySink>, event: AnalysisEvent) {
    tokio::spawn(async move {
        match sink.send(&event).await {
            Ok(()) => debug!(
                sink = sink.name(),
                session_id = %event.session_id,
                "Analysis event delivered"
            ),
            Err(e) => warn!(
                sink = sink.name(),
                session_id = %event.session_id,
                error = %e,
                "Analysis event dropped"
            ),
        }
    });
}
