//! Sentiment classifier capability
//!
//! The workflow only sees the [`Classifier`] trait: one async call from text
//! to a `{label, score}` pair. Two backends ship with the service:
//! - [`LexiconClassifier`]: local word-list scorer, the default, no credential
//! - [`InferenceApiClassifier`]: remote text-classification endpoint, sends
//!   the saved credential as a bearer token when one exists
//!
//! # Example
//! ```rust,ignore
//! let classifier = init_classifier(&config.classifier, credential).await?;
//! let raw = classifier.classify("Great product!").await?;
//! ```

mod inference_api;
mod lexicon;

pub use inference_api::{parse_predictions, InferenceApiClassifier};
pub use lexicon::LexiconClassifier;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::{ClassifierBackend, ClassifierConfig};
use crate::credential::CredentialStore;

/// Top-ranked prediction for one input text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawClassification {
    pub label: String,
    /// Confidence score (0.0-1.0)
    pub score: f64,
}

impl RawClassification {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// Reject scores outside `[0, 1]` (NaN included)
    pub fn validate(self) -> Result<Self, ClassificationError> {
        if (0.0..=1.0).contains(&self.score) {
            Ok(self)
        } else {
            Err(ClassificationError::Malformed(format!(
                "score {} for label '{}' is outside [0, 1]",
                self.score, self.label
            )))
        }
    }
}

/// Keep the highest-scoring candidate
///
/// Ties keep the earlier candidate, which is the classifier's own ranking.
pub fn top_candidate<I>(candidates: I) -> Option<RawClassification>
where
    I: IntoIterator<Item = RawClassification>,
{
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(best) if best.score >= candidate.score => Some(best),
        _ => Some(candidate),
    })
}

/// A single classification attempt failed
///
/// Transient: the session stays usable and the next attempt may succeed.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("Classifier request failed: {0}")]
    Network(String),

    #[error("Classifier returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Classifier returned a malformed result: {0}")]
    Malformed(String),

    #[error("Classifier returned no predictions")]
    EmptyResult,

    #[error("Classification timed out after {0:?}")]
    Timeout(Duration),
}

/// The classifier could not be initialized
///
/// Terminal for the analyze capability until restart.
#[derive(Debug, Error)]
pub enum ModelInitError {
    #[error("Classifier configuration invalid: {0}")]
    Config(String),

    #[error("Classifier client setup failed: {0}")]
    Client(String),
}

/// Text-to-sentiment capability
///
/// Implementations are treated as stateless once built; the workflow never
/// issues two calls at the same time.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Backend name for logs and status
    fn name(&self) -> &str;

    /// Classify one text, returning the top-ranked prediction
    async fn classify(&self, text: &str) -> Result<RawClassification, ClassificationError>;
}

/// Build the configured classifier
///
/// One-time; the returned handle is shared for the whole session.
pub async fn init_classifier(
    config: &ClassifierConfig,
    credential: CredentialStore,
) -> Result<Arc<dyn Classifier>, ModelInitError> {
    let classifier: Arc<dyn Classifier> = match config.backend {
        ClassifierBackend::Lexicon => Arc::new(LexiconClassifier::new()),
        ClassifierBackend::InferenceApi => {
            let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                ModelInitError::Config(
                    "classifier.endpoint is required for the inference_api backend".to_string(),
                )
            })?;
            Arc::new(InferenceApiClassifier::new(
                endpoint,
                config.timeout(),
                credential,
            )?)
        }
    };

    info!(backend = classifier.name(), "Sentiment classifier initialized");
    Ok(classifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_candidate_picks_highest_score() {
        let best = top_candidate(vec![
            RawClassification::new("NEGATIVE", 0.1),
            RawClassification::new("POSITIVE", 0.9),
        ])
        .unwrap();
        assert_eq!(best.label, "POSITIVE");
    }

    #[test]
    fn test_top_candidate_tie_keeps_first() {
        let best = top_candidate(vec![
            RawClassification::new("POSITIVE", 0.5),
            RawClassification::new("NEGATIVE", 0.5),
        ])
        .unwrap();
        assert_eq!(best.label, "POSITIVE");
    }

    #[test]
    fn test_top_candidate_empty() {
        assert!(top_candidate(Vec::new()).is_none());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(RawClassification::new("POSITIVE", 1.0).validate().is_ok());
        assert!(RawClassification::new("POSITIVE", 0.0).validate().is_ok());
        assert!(matches!(
            RawClassification::new("POSITIVE", 1.2).validate(),
            Err(ClassificationError::Malformed(_))
        ));
        assert!(matches!(
            RawClassification::new("POSITIVE", f64::NAN).validate(),
            Err(ClassificationError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_init_inference_api_requires_endpoint() {
        let config = ClassifierConfig {
            backend: ClassifierBackend::InferenceApi,
            ..ClassifierConfig::default()
        };
        let result = init_classifier(&config, CredentialStore::default()).await;
        assert!(matches!(result, Err(ModelInitError::Config(_))));
    }

    #[tokio::test]
    async fn test_init_default_is_lexicon() {
        let classifier = init_classifier(&ClassifierConfig::default(), CredentialStore::default())
            .await
            .unwrap();
        assert_eq!(classifier.name(), "lexicon");
    }
}
