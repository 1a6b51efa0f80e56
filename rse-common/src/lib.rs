//! # RSE Common Library
//!
//! Core of the Review Sentiment Explorer, shared by the web service:
//! - Dataset loading (tab-separated review corpus)
//! - Classifier capability and its backends
//! - Sentiment categorization
//! - Analysis workflow controller (single-flight)
//! - Best-effort telemetry dispatch
//! - Session context and startup sequence
//! - Configuration loading

pub mod categorizer;
pub mod classifier;
pub mod config;
pub mod corpus;
pub mod credential;
pub mod error;
pub mod session;
pub mod startup;
pub mod telemetry;
pub mod workflow;

pub use categorizer::{categorize, Sentiment, SentimentCategory};
pub use classifier::{Classifier, ClassificationError, ModelInitError, RawClassification};
pub use corpus::{DatasetLoader, LoadError, ReviewCorpus};
pub use error::{Error, Result};
pub use session::{PhaseStatus, Session};
pub use telemetry::{AnalysisEvent, TelemetryError, TelemetrySink};
pub use workflow::{AnalysisOutcome, AnalyzeError, WorkflowController, WorkflowState};
