//! Common error types for RSE

use thiserror::Error;

/// Common result type for RSE operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared across the library that are not tied to one pipeline stage
///
/// Pipeline stages carry their own enums (`LoadError`, `ModelInitError`,
/// `ClassificationError`, `TelemetryError`); this one covers configuration
/// and file handling.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
