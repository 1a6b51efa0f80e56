//! Analysis workflow controller
//!
//! Runs one analysis per trigger:
//!
//! ```text
//! Idle → Selecting → Classifying → Categorizing → Rendering → Idle
//!                         └──────→ Failed → Idle
//! ```
//!
//! A busy flag makes the controller single-flight: a trigger that arrives
//! while an analysis is in progress is rejected, not queued. Telemetry for a
//! completed analysis is dispatched on a detached task after the result is
//! built.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::categorizer::{categorize, SentimentCategory};
use crate::classifier::{Classifier, ClassificationError, RawClassification};
use crate::corpus::ReviewCorpus;
use crate::session::{PhaseStatus, Session};
use crate::telemetry::{self, AnalysisEvent, TelemetrySink};

/// Workflow state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowState {
    Idle,
    Selecting,
    Classifying,
    Categorizing,
    Rendering,
    Failed,
}

/// Why an analyze trigger produced no result
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Corpus or classifier not available; message is user-facing
    #[error("{0}")]
    NotReady(String),

    /// Another analysis is in flight; the trigger was dropped
    #[error("An analysis is already in progress")]
    Busy,

    /// The classifier call failed; the next trigger may succeed
    #[error("Sentiment analysis failed: {0}")]
    Classification(#[from] ClassificationError),
}

/// Result of one completed analysis, as rendered on the page
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub review: String,
    pub review_index: usize,
    pub category: SentimentCategory,
    pub analyzed_at: DateTime<Utc>,
    pub session_id: Uuid,
}

/// Uniform index in `[0, len)` via `floor(random() * len)`
///
/// `len` must be non-zero.
pub fn select_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> usize {
    let index = (rng.gen::<f64>() * len as f64).floor() as usize;
    index.min(len - 1)
}

/// Orchestrates selection, classification, categorization and telemetry
pub struct WorkflowController {
    session: Arc<Session>,
    telemetry: Arc<dyn TelemetrySink>,
    classify_timeout: Duration,
    busy: AtomicBool,
    state: RwLock<WorkflowState>,
    rng: Mutex<StdRng>,
}

/// Clears the busy flag and returns to Idle on every exit path
struct BusyGuard<'a> {
    controller: &'a WorkflowController,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.controller.set_state(WorkflowState::Idle);
        self.controller.busy.store(false, Ordering::Release);
    }
}

impl WorkflowController {
    pub fn new(
        session: Arc<Session>,
        telemetry: Arc<dyn TelemetrySink>,
        classify_timeout: Duration,
    ) -> Self {
        Self {
            session,
            telemetry,
            classify_timeout,
            busy: AtomicBool::new(false),
            state: RwLock::new(WorkflowState::Idle),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Replace the entropy-seeded RNG with a deterministic one
    pub fn with_rng_seed(self, seed: u64) -> Self {
        *self.rng.lock().unwrap_or_else(PoisonError::into_inner) = StdRng::seed_from_u64(seed);
        self
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn state(&self) -> WorkflowState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Why analyze would be refused right now, if it would
    pub fn readiness_error(&self) -> Option<String> {
        self.ready_parts().err()
    }

    /// Run one analysis
    ///
    /// Returns [`AnalyzeError::NotReady`] or [`AnalyzeError::Busy`] without
    /// touching any state when the entry guard refuses.
    pub async fn analyze(&self) -> Result<AnalysisOutcome, AnalyzeError> {
        let (corpus, classifier) = self.ready_parts().map_err(AnalyzeError::NotReady)?;

        let _guard = self.try_acquire().ok_or_else(|| {
            debug!(session_id = %self.session.id(), "Analyze trigger dropped, already busy");
            AnalyzeError::Busy
        })?;

        self.set_state(WorkflowState::Selecting);
        let review_index = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            select_index(&mut *rng, corpus.len())
        };
        let review = corpus.get(review_index).unwrap_or_default().to_string();
        debug!(review_index, "Review selected");

        self.set_state(WorkflowState::Classifying);
        let raw = match self.classify(classifier.as_ref(), &review).await {
            Ok(raw) => raw,
            Err(e) => {
                self.set_state(WorkflowState::Failed);
                warn!(
                    session_id = %self.session.id(),
                    classifier = classifier.name(),
                    error = %e,
                    "Classification failed"
                );
                return Err(AnalyzeError::Classification(e));
            }
        };

        self.set_state(WorkflowState::Categorizing);
        let category = categorize(&raw);

        self.set_state(WorkflowState::Rendering);
        let outcome = AnalysisOutcome {
            review,
            review_index,
            category,
            analyzed_at: Utc::now(),
            session_id: self.session.id(),
        };

        info!(
            session_id = %outcome.session_id,
            review_index,
            raw_label = %raw.label,
            sentiment = outcome.category.label,
            confidence = %outcome.category.confidence,
            "Analysis completed"
        );

        let event = AnalysisEvent::new(
            outcome.review.clone(),
            &outcome.category,
            outcome.analyzed_at,
            outcome.session_id,
        );
        telemetry::dispatch(Arc::clone(&self.telemetry), event);

        Ok(outcome)
    }

    async fn classify(
        &self,
        classifier: &dyn Classifier,
        text: &str,
    ) -> Result<RawClassification, ClassificationError> {
        let raw = tokio::time::timeout(self.classify_timeout, classifier.classify(text))
            .await
            .map_err(|_| ClassificationError::Timeout(self.classify_timeout))??;
        raw.validate()
    }

    fn ready_parts(&self) -> Result<(Arc<ReviewCorpus>, Arc<dyn Classifier>), String> {
        let corpus = match self.session.corpus() {
            Some(corpus) => corpus,
            None => {
                return Err(match self.session.dataset_status() {
                    PhaseStatus::Failed(message) => format!("Reviews failed to load: {}", message),
                    _ => "Reviews are still loading".to_string(),
                })
            }
        };

        let classifier = match self.session.classifier() {
            Some(classifier) => classifier,
            None => {
                return Err(match self.session.model_status() {
                    PhaseStatus::Failed(message) => {
                        format!("Sentiment model failed to initialize: {}", message)
                    }
                    _ => "Sentiment model is still initializing".to_string(),
                })
            }
        };

        Ok((corpus, classifier))
    }

    fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard { controller: self })
    }

    fn set_state(&self, state: WorkflowState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }
}
