//! Incident history classification
//!
//! The keyword classifier is a small rule engine: every bucket whose keywords
//! appear in the text adds its points once, and the total maps to a level.
//! Callers only see the [`HistoryClassifier`] trait, so a semantic classifier
//! can replace it without touching the pipeline.

use super::tables::HistoryRules;
use crate::models::HistoryRiskLevel;
use std::sync::Arc;
use tracing::debug;

/// Turns free-text incident history into a coarse risk level
pub trait HistoryClassifier: Send + Sync {
    fn classify(&self, history: &str) -> HistoryRiskLevel;
}

#[derive(Debug, Clone)]
pub struct KeywordHistoryClassifier {
    rules: Arc<HistoryRules>,
}

impl KeywordHistoryClassifier {
    #[must_use]
    pub fn new(rules: Arc<HistoryRules>) -> Self {
        Self { rules }
    }

    /// Sum of bucket points for the text, each bucket counted at most once
    #[must_use]
    pub fn score(&self, history: &str) -> u32 {
        let text = history.to_lowercase();
        self.rules
            .buckets
            .iter()
            .filter(|bucket| bucket.keywords.iter().any(|k| text.contains(k.as_str())))
            .map(|bucket| bucket.points)
            .sum()
    }
}

impl HistoryClassifier for KeywordHistoryClassifier {
    fn classify(&self, history: &str) -> HistoryRiskLevel {
        if history.trim().is_empty() {
            return HistoryRiskLevel::Low;
        }

        let score = self.score(history);
        let level = if score >= self.rules.high_at {
            HistoryRiskLevel::High
        } else if score >= self.rules.medium_at {
            HistoryRiskLevel::Medium
        } else {
            HistoryRiskLevel::Low
        };

        debug!("History scored {} -> {}", score, level);
        level
    }
}
