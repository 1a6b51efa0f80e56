//! Remote text-classification endpoint client
//!
//! Speaks the common hosted-inference shape: `POST {"inputs": text}`, reply
//! is a list of `{label, score}` candidates, optionally wrapped in an outer
//! list (one entry per input). Only the top-ranked candidate is kept.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::{top_candidate, Classifier, ClassificationError, ModelInitError, RawClassification};
use crate::credential::CredentialStore;

const USER_AGENT: &str = concat!("rse/", env!("CARGO_PKG_VERSION"));
/// Error bodies are cut to this many characters in messages
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Predictions {
    Batched(Vec<Vec<RawClassification>>),
    Flat(Vec<RawClassification>),
    Single(RawClassification),
}

/// Parse an endpoint reply into its top-ranked prediction
pub fn parse_predictions(body: &str) -> Result<RawClassification, ClassificationError> {
    let predictions: Predictions = serde_json::from_str(body)
        .map_err(|e| ClassificationError::Malformed(e.to_string()))?;

    let candidates = match predictions {
        Predictions::Batched(batches) => batches.into_iter().next().unwrap_or_default(),
        Predictions::Flat(candidates) => candidates,
        Predictions::Single(candidate) => vec![candidate],
    };

    top_candidate(candidates).ok_or(ClassificationError::EmptyResult)
}

/// Classifier calling a remote inference endpoint
pub struct InferenceApiClassifier {
    http_client: reqwest::Client,
    endpoint: reqwest::Url,
    credential: CredentialStore,
}

impl InferenceApiClassifier {
    pub fn new(
        endpoint: &str,
        timeout: Duration,
        credential: CredentialStore,
    ) -> Result<Self, ModelInitError> {
        let endpoint = reqwest::Url::parse(endpoint)
            .map_err(|e| ModelInitError::Config(format!("invalid endpoint '{}': {}", endpoint, e)))?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ModelInitError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint,
            credential,
        })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

#[async_trait]
impl Classifier for InferenceApiClassifier {
    fn name(&self) -> &str {
        "inference_api"
    }

    async fn classify(&self, text: &str) -> Result<RawClassification, ClassificationError> {
        let mut request = self
            .http_client
            .post(self.endpoint.clone())
            .json(&json!({ "inputs": text }));

        let token = self.credential.get();
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }

        debug!(
            endpoint = %self.endpoint,
            authenticated = token.is_some(),
            "Querying inference endpoint"
        );

        let response = request
            .send()
            .await
            .map_err(|e| ClassificationError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClassificationError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ClassificationError::Status {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        parse_predictions(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_batched_reply() {
        let body = r#"[[{"label":"POSITIVE","score":0.98},{"label":"NEGATIVE","score":0.02}]]"#;
        let top = parse_predictions(body).unwrap();
        assert_eq!(top, RawClassification::new("POSITIVE", 0.98));
    }

    #[test]
    fn test_parse_flat_reply_unsorted() {
        let body = r#"[{"label":"POSITIVE","score":0.3},{"label":"NEGATIVE","score":0.7}]"#;
        let top = parse_predictions(body).unwrap();
        assert_eq!(top.label, "NEGATIVE");
    }

    #[test]
    fn test_parse_single_object_reply() {
        let body = r#"{"label":"NEGATIVE","score":0.61,"extra":"ignored"}"#;
        let top = parse_predictions(body).unwrap();
        assert_eq!(top, RawClassification::new("NEGATIVE", 0.61));
    }

    #[test]
    fn test_parse_empty_reply() {
        assert!(matches!(parse_predictions("[]"), Err(ClassificationError::EmptyResult)));
        assert!(matches!(parse_predictions("[[]]"), Err(ClassificationError::EmptyResult)));
    }

    #[test]
    fn test_parse_malformed_reply() {
        assert!(matches!(
            parse_predictions(r#"{"error":"Model is loading"}"#),
            Err(ClassificationError::Malformed(_))
        ));
        assert!(matches!(
            parse_predictions("not json"),
            Err(ClassificationError::Malformed(_))
        ));
    }

    #[test]
    fn test_invalid_endpoint_is_init_error() {
        let result = InferenceApiClassifier::new(
            "not a url",
            Duration::from_secs(5),
            CredentialStore::default(),
        );
        assert!(matches!(result, Err(ModelInitError::Config(_))));
    }
}
