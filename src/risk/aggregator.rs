//! Combines history level and weather findings into one score

use super::comparator::round2;
use super::tables::ScoreWeights;
use crate::models::{AggregateScore, HazardFindings, HistoryRiskLevel, RiskLevel};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    weights: Arc<ScoreWeights>,
}

impl ScoreAggregator {
    #[must_use]
    pub fn new(weights: Arc<ScoreWeights>) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn history_score(&self, level: HistoryRiskLevel) -> f64 {
        let history = &self.weights.history;
        match level {
            HistoryRiskLevel::Low => history.low,
            HistoryRiskLevel::Medium => history.medium,
            HistoryRiskLevel::High => history.high,
        }
    }

    /// Sum of hazard weights, capped
    #[must_use]
    pub fn weather_score(&self, findings: &HazardFindings) -> f64 {
        let total: f64 = findings
            .ids()
            .filter_map(|id| self.weights.hazards.get(id))
            .sum();
        total.min(self.weights.weather_cap)
    }

    #[must_use]
    pub fn level_for(&self, score: f64) -> RiskLevel {
        if score >= self.weights.levels.high {
            RiskLevel::High
        } else if score >= self.weights.levels.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    #[must_use]
    pub fn aggregate(
        &self,
        history: HistoryRiskLevel,
        findings: &HazardFindings,
    ) -> AggregateScore {
        let history_score = self.history_score(history);
        let weather_score = self.weather_score(findings);
        let score = round2(((history_score + weather_score) / 2.0).clamp(0.0, 1.0));

        AggregateScore {
            score,
            level: self.level_for(score),
            history_score,
            weather_score,
        }
    }
}
