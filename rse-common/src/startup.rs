//! Startup sequence
//!
//! Dataset load and classifier init run concurrently. Each phase records its
//! own outcome in the [`Session`]; a failure in one does not stop the other.

use tracing::{error, info};

use crate::classifier::init_classifier;
use crate::config::TomlConfig;
use crate::corpus::{DatasetLoader, LoadError, ReviewCorpus};
use crate::session::Session;

/// Run both startup phases; returns true when the session is ready
pub async fn run(session: &Session, config: &TomlConfig) -> bool {
    info!(
        session_id = %session.id(),
        dataset = %config.dataset,
        backend = ?config.classifier.backend,
        "Starting dataset load and classifier init"
    );

    let init_model = init_classifier(&config.classifier, session.credential().clone());

    let (corpus, classifier) = tokio::join!(load_corpus(config), init_model);

    match corpus {
        Ok(corpus) => {
            session.install_corpus(corpus);
        }
        Err(e) => {
            error!("Dataset load failed: {}", e);
            session.fail_dataset(e.to_string());
        }
    }

    match classifier {
        Ok(classifier) => {
            session.install_classifier(classifier);
        }
        Err(e) => {
            error!("Classifier init failed: {}", e);
            session.fail_model(e.to_string());
        }
    }

    let ready = session.is_ready();
    if ready {
        info!(session_id = %session.id(), "Session ready");
    }
    ready
}

async fn load_corpus(config: &TomlConfig) -> Result<ReviewCorpus, LoadError> {
    let loader = DatasetLoader::new(config.text_column.as_str(), config.fetch_timeout())?;
    loader.load(&config.dataset).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClassifierBackend, ClassifierConfig};
    use crate::credential::CredentialStore;
    use crate::session::PhaseStatus;
    use tempfile::TempDir;

    fn write_dataset(dir: &TempDir, contents: &str) -> String {
        let path = dir.path().join("reviews.tsv");
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn test_both_phases_succeed() {
        let dir = TempDir::new().unwrap();
        let config = TomlConfig {
            dataset: write_dataset(&dir, "label\ttext\n1\tGreat product!\n0\tTerrible service.\n"),
            ..TomlConfig::default()
        };
        let session = Session::new(CredentialStore::default());

        assert!(run(&session, &config).await);
        assert_eq!(session.corpus().unwrap().len(), 2);
        assert_eq!(session.classifier().unwrap().name(), "lexicon");
    }

    #[tokio::test]
    async fn test_dataset_failure_does_not_block_model() {
        let dir = TempDir::new().unwrap();
        let config = TomlConfig {
            dataset: dir.path().join("missing.tsv").to_string_lossy().into_owned(),
            ..TomlConfig::default()
        };
        let session = Session::new(CredentialStore::default());

        assert!(!run(&session, &config).await);
        assert!(matches!(session.dataset_status(), PhaseStatus::Failed(_)));
        assert_eq!(session.model_status(), PhaseStatus::Ready);
    }

    #[tokio::test]
    async fn test_model_failure_is_recorded() {
        let dir = TempDir::new().unwrap();
        let config = TomlConfig {
            dataset: write_dataset(&dir, "text\nfine\n"),
            classifier: ClassifierConfig {
                backend: ClassifierBackend::InferenceApi,
                ..ClassifierConfig::default()
            },
            ..TomlConfig::default()
        };
        let session = Session::new(CredentialStore::default());

        assert!(!run(&session, &config).await);
        assert_eq!(session.dataset_status(), PhaseStatus::Ready);
        match session.model_status() {
            PhaseStatus::Failed(message) => assert!(message.contains("endpoint")),
            other => panic!("unexpected model status: {:?}", other),
        }
    }
}
