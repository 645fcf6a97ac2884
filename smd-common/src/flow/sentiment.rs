//! Severity classification
//!
//! The threshold rule is fixed: below the midpoint is positive, the midpoint
//! itself is neutral, above it is negative.

use serde::{Deserialize, Serialize};

/// Severity score that classifies as neutral
pub const NEUTRAL_SEVERITY: i64 = 5;

/// Sentiment bucket derived from a severity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentBucket {
    Positive,
    Neutral,
    Negative,
}

impl SentimentBucket {
    /// Graph order of the sentiment nodes
    pub const ALL: [SentimentBucket; 3] = [
        SentimentBucket::Positive,
        SentimentBucket::Neutral,
        SentimentBucket::Negative,
    ];

    /// Classify a severity score. Total over all integers.
    pub fn classify(severity: i64) -> Self {
        match severity.cmp(&NEUTRAL_SEVERITY) {
            std::cmp::Ordering::Less => SentimentBucket::Positive,
            std::cmp::Ordering::Equal => SentimentBucket::Neutral,
            std::cmp::Ordering::Greater => SentimentBucket::Negative,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentBucket::Positive => "Positive",
            SentimentBucket::Neutral => "Neutral",
            SentimentBucket::Negative => "Negative",
        }
    }

    /// Fixed node color
    pub fn color(&self) -> &'static str {
        match self {
            SentimentBucket::Positive => "#0B6E4F",
            SentimentBucket::Neutral => "#fa9f42",
            SentimentBucket::Negative => "#721817",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.label() == label)
    }
}

impl std::fmt::Display for SentimentBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_thresholds() {
        for severity in 1..=4 {
            assert_eq!(SentimentBucket::classify(severity), SentimentBucket::Positive);
        }
        assert_eq!(SentimentBucket::classify(5), SentimentBucket::Neutral);
        for severity in 6..=10 {
            assert_eq!(SentimentBucket::classify(severity), SentimentBucket::Negative);
        }
    }

    #[test]
    fn test_classify_out_of_range_scores() {
        assert_eq!(SentimentBucket::classify(0), SentimentBucket::Positive);
        assert_eq!(SentimentBucket::classify(-3), SentimentBucket::Positive);
        assert_eq!(SentimentBucket::classify(42), SentimentBucket::Negative);
    }

    #[test]
    fn test_label_round_trip() {
        for bucket in SentimentBucket::ALL {
            assert_eq!(SentimentBucket::from_label(bucket.label()), Some(bucket));
        }
        assert_eq!(SentimentBucket::from_label("positive"), None);
    }
}
