//! Local word-list sentiment scorer
//!
//! Counts positive and negative words (a preceding negation flips the
//! polarity of the next sentiment word) and turns the counts into a
//! Laplace-smoothed probability. Balanced text scores exactly 0.5, which
//! the categorizer reports as Neutral.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashSet;

use super::{Classifier, ClassificationError, RawClassification};
use crate::categorizer::{NEGATIVE_LABEL, POSITIVE_LABEL};

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "good", "great", "excellent", "amazing", "wonderful", "fantastic", "superb",
        "outstanding", "brilliant", "love", "loved", "loves", "best", "better", "happy",
        "perfect", "awesome", "incredible", "delightful", "pleasant", "satisfied",
        "recommend", "recommended", "impressive", "exceptional", "reliable", "helpful",
        "quality", "worth", "nice", "easy", "comfortable", "sturdy", "fast", "friendly",
        "beautiful", "favorite", "works", "enjoy", "enjoyed", "glad", "pleased",
    ]
    .into_iter()
    .collect()
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bad", "terrible", "awful", "horrible", "poor", "worst", "worse", "hate",
        "hated", "dislike", "disappointing", "disappointed", "failure", "failed",
        "fail", "broken", "broke", "defective", "useless", "waste", "scam", "fake",
        "unreliable", "slow", "difficult", "confusing", "overpriced", "worthless",
        "garbage", "trash", "cheap", "flimsy", "rude", "refund", "return", "returned",
        "annoying", "frustrating", "mediocre", "unhappy", "damaged", "leaks",
    ]
    .into_iter()
    .collect()
});

static NEGATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "not", "no", "never", "dont", "don't", "doesnt", "doesn't", "didnt", "didn't",
        "isnt", "isn't", "wasnt", "wasn't", "cannot", "cant", "can't", "wont", "won't",
    ]
    .into_iter()
    .collect()
});

/// Word counts behind a lexicon score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexiconCounts {
    pub positive: usize,
    pub negative: usize,
}

/// Local classifier backed by fixed word lists
#[derive(Debug, Default)]
pub struct LexiconClassifier;

impl LexiconClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Count sentiment words, applying one-word negation
    pub fn count(text: &str) -> LexiconCounts {
        let lowercase = text.to_lowercase();
        let mut counts = LexiconCounts::default();
        let mut negate_next = false;

        for word in lowercase
            .split(|c: char| !(c.is_alphabetic() || c == '\''))
            .map(|w| w.trim_matches('\''))
            .filter(|w| !w.is_empty())
        {
            if NEGATIONS.contains(word) {
                negate_next = true;
                continue;
            }

            let polarity = if POSITIVE_WORDS.contains(word) {
                Some(true)
            } else if NEGATIVE_WORDS.contains(word) {
                Some(false)
            } else {
                None
            };

            if let Some(positive) = polarity {
                if positive != negate_next {
                    counts.positive += 1;
                } else {
                    counts.negative += 1;
                }
                negate_next = false;
            }
        }

        counts
    }

    /// Score text without going through the async trait
    pub fn score(text: &str) -> RawClassification {
        let counts = Self::count(text);
        let total = (counts.positive + counts.negative) as f64;
        let positive_probability = (counts.positive as f64 + 1.0) / (total + 2.0);

        if counts.positive >= counts.negative {
            RawClassification::new(POSITIVE_LABEL, positive_probability)
        } else {
            RawClassification::new(NEGATIVE_LABEL, 1.0 - positive_probability)
        }
    }
}

#[async_trait]
impl Classifier for LexiconClassifier {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn classify(&self, text: &str) -> Result<RawClassification, ClassificationError> {
        Ok(Self::score(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorizer::{categorize, Sentiment};

    #[test]
    fn test_positive_review() {
        let raw = LexiconClassifier::score("Great product!");
        assert_eq!(raw.label, "POSITIVE");
        assert!(raw.score > 0.5);
        assert_eq!(categorize(&raw).sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_negative_review() {
        let raw = LexiconClassifier::score("Terrible service.");
        assert_eq!(raw.label, "NEGATIVE");
        assert!(raw.score > 0.5);
        assert_eq!(categorize(&raw).sentiment, Sentiment::Negative);
    }

    #[test]
    fn test_negation_flips_polarity() {
        let counts = LexiconClassifier::count("This is not good at all");
        assert_eq!(counts, LexiconCounts { positive: 0, negative: 1 });

        let counts = LexiconClassifier::count("Honestly it wasn't bad");
        assert_eq!(counts, LexiconCounts { positive: 1, negative: 0 });
    }

    #[test]
    fn test_no_sentiment_words_scores_half() {
        let raw = LexiconClassifier::score("The box arrived on Tuesday.");
        assert_eq!(raw.score, 0.5);
        assert_eq!(categorize(&raw).sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_balanced_text_is_neutral() {
        let raw = LexiconClassifier::score("Great screen, terrible battery.");
        assert_eq!(raw.score, 0.5);
        assert_eq!(categorize(&raw).sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_score_stays_in_unit_range() {
        let raw = LexiconClassifier::score("great great great great great great great");
        assert!(raw.score > 0.5 && raw.score < 1.0);
    }
}
