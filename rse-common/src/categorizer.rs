//! Sentiment categorization
//!
//! Maps a raw classifier result onto the three-way category shown to the
//! user. Only `POSITIVE` and `NEGATIVE` are recognized labels and both need
//! a score strictly above 0.5; everything else is Neutral.

use serde::Serialize;

use crate::classifier::RawClassification;

/// Recognized positive label
pub const POSITIVE_LABEL: &str = "POSITIVE";
/// Recognized negative label
pub const NEGATIVE_LABEL: &str = "NEGATIVE";
/// Score a recognized label must exceed (strictly)
pub const CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Three-way sentiment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Display label text
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }

    /// Icon tag the page maps to a glyph
    pub fn icon(self) -> &'static str {
        match self {
            Sentiment::Positive => "smile",
            Sentiment::Negative => "frown",
            Sentiment::Neutral => "meh",
        }
    }
}

/// Category plus the derived display payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentCategory {
    pub sentiment: Sentiment,
    pub label: &'static str,
    pub icon: &'static str,
    /// Raw model score, whatever the category
    pub score: f64,
    /// `score * 100` with one decimal, e.g. `"95.0%"`
    pub confidence: String,
}

/// Map a raw classification onto a [`SentimentCategory`]
///
/// Pure and deterministic. A score of exactly 0.5 is Neutral for every
/// label.
pub fn categorize(raw: &RawClassification) -> SentimentCategory {
    let sentiment = match raw.label.as_str() {
        POSITIVE_LABEL if raw.score > CONFIDENCE_THRESHOLD => Sentiment::Positive,
        NEGATIVE_LABEL if raw.score > CONFIDENCE_THRESHOLD => Sentiment::Negative,
        _ => Sentiment::Neutral,
    };

    SentimentCategory {
        sentiment,
        label: sentiment.label(),
        icon: sentiment.icon(),
        score: raw.score,
        confidence: format_confidence(raw.score),
    }
}

/// Format a score in `[0, 1]` as a percentage with one decimal
pub fn format_confidence(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}
