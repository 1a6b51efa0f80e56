//! Session context
//!
//! Owns everything the analyze workflow reads: the corpus, the classifier
//! handle, the startup phase status and the saved credential. Both the
//! corpus and the classifier are set at most once.

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::corpus::ReviewCorpus;
use crate::credential::CredentialStore;

/// Progress of one startup phase (dataset load, model init)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum PhaseStatus {
    Pending,
    Ready,
    Failed(String),
}

/// Explicit per-session context shared by the controller and the web layer
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    corpus: OnceCell<Arc<ReviewCorpus>>,
    classifier: OnceCell<Arc<dyn Classifier>>,
    dataset_status: RwLock<PhaseStatus>,
    model_status: RwLock<PhaseStatus>,
    credential: CredentialStore,
}

impl Session {
    /// New session with both phases pending
    pub fn new(credential: CredentialStore) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            corpus: OnceCell::new(),
            classifier: OnceCell::new(),
            dataset_status: RwLock::new(PhaseStatus::Pending),
            model_status: RwLock::new(PhaseStatus::Pending),
            credential,
        }
    }

    /// Session with corpus and classifier already in place
    pub fn ready(corpus: ReviewCorpus, classifier: Arc<dyn Classifier>) -> Self {
        let session = Self::new(CredentialStore::default());
        session.install_corpus(corpus);
        session.install_classifier(classifier);
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn credential(&self) -> &CredentialStore {
        &self.credential
    }

    /// Store the loaded corpus; returns false if one was already set
    pub fn install_corpus(&self, corpus: ReviewCorpus) -> bool {
        let installed = self.corpus.set(Arc::new(corpus)).is_ok();
        if installed {
            set_status(&self.dataset_status, PhaseStatus::Ready);
        }
        installed
    }

    /// Record a terminal dataset load failure
    pub fn fail_dataset(&self, message: impl Into<String>) {
        set_status(&self.dataset_status, PhaseStatus::Failed(message.into()));
    }

    /// Store the initialized classifier; returns false if one was already set
    pub fn install_classifier(&self, classifier: Arc<dyn Classifier>) -> bool {
        let installed = self.classifier.set(classifier).is_ok();
        if installed {
            set_status(&self.model_status, PhaseStatus::Ready);
        }
        installed
    }

    /// Record a terminal classifier init failure
    pub fn fail_model(&self, message: impl Into<String>) {
        set_status(&self.model_status, PhaseStatus::Failed(message.into()));
    }

    pub fn corpus(&self) -> Option<Arc<ReviewCorpus>> {
        self.corpus.get().cloned()
    }

    pub fn classifier(&self) -> Option<Arc<dyn Classifier>> {
        self.classifier.get().cloned()
    }

    pub fn dataset_status(&self) -> PhaseStatus {
        get_status(&self.dataset_status)
    }

    pub fn model_status(&self) -> PhaseStatus {
        get_status(&self.model_status)
    }

    /// Both startup phases finished successfully
    pub fn is_ready(&self) -> bool {
        self.corpus.get().is_some() && self.classifier.get().is_some()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("started_at", &self.started_at)
            .field("corpus_len", &self.corpus.get().map(|c| c.len()))
            .field("classifier", &self.classifier.get().map(|c| c.name().to_string()))
            .field("dataset_status", &self.dataset_status())
            .field("model_status", &self.model_status())
            .field("credential", &self.credential)
            .finish()
    }
}

fn set_status(lock: &RwLock<PhaseStatus>, status: PhaseStatus) {
    *lock.write().unwrap_or_else(PoisonError::into_inner) = status;
}

fn get_status(lock: &RwLock<PhaseStatus>) -> PhaseStatus {
    lock.read().unwrap_or_else(PoisonError::into_inner).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::LexiconClassifier;

    #[test]
    fn test_new_session_is_pending() {
        let session = Session::new(CredentialStore::default());
        assert_eq!(session.dataset_status(), PhaseStatus::Pending);
        assert_eq!(session.model_status(), PhaseStatus::Pending);
        assert!(!session.is_ready());
        assert!(session.corpus().is_none());
    }

    #[test]
    fn test_install_marks_ready_once() {
        let session = Session::new(CredentialStore::default());
        assert!(session.install_corpus(ReviewCorpus::new(["a"]).unwrap()));
        assert!(!session.install_corpus(ReviewCorpus::new(["b"]).unwrap()));
        assert_eq!(session.corpus().unwrap().get(0), Some("a"));
        assert_eq!(session.dataset_status(), PhaseStatus::Ready);

        assert!(!session.is_ready());
        assert!(session.install_classifier(Arc::new(LexiconClassifier::new())));
        assert!(session.is_ready());
    }

    #[test]
    fn test_failed_phase_keeps_message() {
        let session = Session::new(CredentialStore::default());
        session.fail_dataset("HTTP 404");
        assert_eq!(session.dataset_status(), PhaseStatus::Failed("HTTP 404".to_string()));
        assert!(!session.is_ready());
    }

    #[test]
    fn test_phase_status_serialization() {
        let json = serde_json::to_value(PhaseStatus::Failed("boom".to_string())).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["message"], "boom");

        let json = serde_json::to_value(PhaseStatus::Ready).unwrap();
        assert_eq!(json["status"], "ready");
    }
}
