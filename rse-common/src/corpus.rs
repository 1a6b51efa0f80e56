//! Review corpus and dataset loader
//!
//! The dataset is a tab-separated table whose first row names the columns.
//! Only the designated text column is kept; values are trimmed and empty
//! ones dropped. Malformed rows are logged and skipped. The load fails only
//! when nothing usable survives. Quote characters are plain text: every line
//! is exactly one row.

use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Dataset load errors
///
/// All variants are terminal for startup: the analyze control stays
/// disabled until the service is restarted.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Transport-level failure (connection refused, timeout, body read)
    #[error("Dataset fetch failed: {0}")]
    Fetch(String),

    /// Server answered with a non-success status
    #[error("Dataset request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Local dataset file could not be read
    #[error("Dataset read failed: {0}")]
    Io(#[from] std::io::Error),

    /// Payload is not tab-separated tabular data
    #[error("Dataset parse failed: {0}")]
    Parse(String),

    /// Header row lacks the designated text column
    #[error("Dataset header has no '{0}' column")]
    MissingColumn(String),

    /// No row carried a non-empty text value
    #[error("Dataset contains no usable reviews")]
    Empty,
}

/// Ordered, immutable set of review texts
///
/// Never empty; every entry is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCorpus {
    reviews: Vec<String>,
}

impl ReviewCorpus {
    /// Build a corpus, trimming entries and dropping blank ones
    ///
    /// Returns [`LoadError::Empty`] when no entry survives.
    pub fn new<I, S>(reviews: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let reviews: Vec<String> = reviews
            .into_iter()
            .map(|r| r.as_ref().trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();

        if reviews.is_empty() {
            return Err(LoadError::Empty);
        }

        Ok(Self { reviews })
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    /// Always false for a constructed corpus
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.reviews.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.reviews.iter().map(String::as_str)
    }
}

/// Result of parsing a dataset payload
#[derive(Debug)]
pub struct ParsedDataset {
    pub corpus: ReviewCorpus,
    /// Rows dropped as malformed (field count mismatch, invalid UTF-8)
    pub skipped_rows: usize,
}

/// Parse a tab-separated payload and extract the `column` values
pub fn parse_tsv(payload: &[u8], column: &str) -> Result<ParsedDataset, LoadError> {
    let payload = payload.strip_prefix(UTF8_BOM).unwrap_or(payload);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .has_headers(true)
        .flexible(true)
        .from_reader(payload);

    let headers = reader
        .byte_headers()
        .map_err(|e| LoadError::Parse(format!("unreadable header row: {}", e)))?
        .clone();

    let column_index = headers
        .iter()
        .position(|h| String::from_utf8_lossy(h).trim() == column)
        .ok_or_else(|| LoadError::MissingColumn(column.to_string()))?;

    let mut reviews = Vec::new();
    let mut skipped_rows = 0usize;

    for (row, record) in reader.byte_records().enumerate() {
        // Header is line 1
        let line = row + 2;

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(line, error = %e, "Skipping unreadable dataset row");
                skipped_rows += 1;
                continue;
            }
        };

        if record.len() != headers.len() {
            warn!(
                line,
                expected = headers.len(),
                found = record.len(),
                "Skipping dataset row with wrong field count"
            );
            skipped_rows += 1;
            continue;
        }

        let Some(field) = record.get(column_index) else {
            skipped_rows += 1;
            continue;
        };

        match std::str::from_utf8(field) {
            Ok(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    reviews.push(text.to_string());
                }
            }
            Err(e) => {
                warn!(line, error = %e, "Skipping dataset row with invalid UTF-8");
                skipped_rows += 1;
            }
        }
    }

    let corpus = ReviewCorpus::new(reviews)?;
    Ok(ParsedDataset {
        corpus,
        skipped_rows,
    })
}

/// Whether a dataset source names a network resource
pub fn is_remote_source(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Fetches and parses the review dataset
pub struct DatasetLoader {
    http_client: reqwest::Client,
    text_column: String,
}

impl DatasetLoader {
    /// Create a loader extracting `text_column`, with a fetch timeout
    pub fn new(text_column: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoadError::Fetch(e.to_string()))?;

        Ok(Self {
            http_client,
            text_column: text_column.into(),
        })
    }

    pub fn text_column(&self) -> &str {
        &self.text_column
    }

    /// Load the corpus from a URL or a local path
    ///
    /// Single atomic load: no streaming, no retry.
    pub async fn load(&self, source: &str) -> Result<ReviewCorpus, LoadError> {
        let payload = if is_remote_source(source) {
            self.fetch(source).await?
        } else {
            debug!(path = source, "Reading dataset from local file");
            tokio::fs::read(source).await?
        };

        let parsed = parse_tsv(&payload, &self.text_column)?;

        if parsed.skipped_rows > 0 {
            warn!(
                skipped = parsed.skipped_rows,
                "Dataset loaded with malformed rows skipped"
            );
        }

        info!(
            source,
            reviews = parsed.corpus.len(),
            column = %self.text_column,
            "Review dataset loaded"
        );

        Ok(parsed.corpus)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        debug!(url, "Fetching dataset");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LoadError::Fetch(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}
