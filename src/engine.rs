//! Risk assessment pipeline
//!
//! Resolves the location, fetches the forecast, compares it against the
//! threshold table, classifies the incident history and aggregates the score.
//! Errors from resolution and the provider are propagated as-is; nothing here
//! retries.

use crate::location_resolver::LocationResolver;
use crate::models::{AssessmentResult, LocationQuery};
use crate::risk::{
    HistoryClassifier, KeywordHistoryClassifier, RiskTables, ScoreAggregator, ThresholdComparator,
};
use crate::weather::{Geocoder, WeatherProvider};
use crate::Result;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const DEFAULT_HORIZON_DAYS: u32 = 3;
pub const DEFAULT_POLICY: &str = "Standard Home Insurance";

/// One assessment request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub location: LocationQuery,
    #[serde(default)]
    pub policy: Option<String>,
    /// Free-text incident history
    #[serde(default)]
    pub history: Option<String>,
}

impl AssessmentRequest {
    #[must_use]
    pub fn new(location: impl Into<LocationQuery>) -> Self {
        Self {
            location: location.into(),
            policy: None,
            history: None,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = Some(policy.into());
        self
    }

    #[must_use]
    pub fn with_history(mut self, history: impl Into<String>) -> Self {
        self.history = Some(history.into());
        self
    }

    /// History text, empty when absent
    #[must_use]
    pub fn history_text(&self) -> &str {
        self.history.as_deref().unwrap_or_default()
    }
}

pub struct RiskAssessmentEngine {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherProvider>,
    comparator: ThresholdComparator,
    classifier: Arc<dyn HistoryClassifier>,
    aggregator: ScoreAggregator,
    horizon_days: u32,
    default_policy: String,
}

impl RiskAssessmentEngine {
    #[must_use]
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherProvider>,
        tables: &RiskTables,
    ) -> Self {
        Self {
            geocoder,
            weather,
            comparator: ThresholdComparator::new(tables.hazards.clone()),
            classifier: Arc::new(KeywordHistoryClassifier::new(tables.history.clone())),
            aggregator: ScoreAggregator::new(tables.weights.clone()),
            horizon_days: DEFAULT_HORIZON_DAYS,
            default_policy: DEFAULT_POLICY.to_string(),
        }
    }

    #[must_use]
    pub fn with_horizon_days(mut self, days: u32) -> Self {
        self.horizon_days = days.max(1);
        self
    }

    #[must_use]
    pub fn with_default_policy(mut self, policy: impl Into<String>) -> Self {
        self.default_policy = policy.into();
        self
    }

    /// Swap the history classifier, e.g. for a semantic one
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn HistoryClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    #[must_use]
    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    /// Assess starting from today's UTC date
    pub async fn assess(&self, request: &AssessmentRequest) -> Result<AssessmentResult> {
        self.assess_from(request, Utc::now().date_naive()).await
    }

    #[instrument(skip(self, request), fields(location = %request.location.display_name()))]
    pub async fn assess_from(
        &self,
        request: &AssessmentRequest,
        start: NaiveDate,
    ) -> Result<AssessmentResult> {
        info!("Assessing disaster risk");

        let coordinates =
            LocationResolver::resolve(self.geocoder.as_ref(), &request.location).await?;
        debug!("Resolved coordinates: {}", coordinates.format_coordinates());

        let series = self
            .weather
            .daily_forecast(coordinates, start, self.horizon_days)
            .await?;
        let weather_analysis = self.comparator.compare(&series);

        let history_risk = self.classifier.classify(request.history_text());
        let aggregate = self
            .aggregator
            .aggregate(history_risk, &weather_analysis.risks_found);

        let policy = match request.policy.as_deref().map(str::trim) {
            Some(policy) if !policy.is_empty() => policy.to_string(),
            _ => self.default_policy.clone(),
        };

        info!(
            "Assessment complete: score {} ({}), {} hazards",
            aggregate.score,
            aggregate.level,
            weather_analysis.risks_found.len()
        );

        Ok(AssessmentResult {
            location: request.location.display_name(),
            coordinates,
            history_risk,
            weather_analysis,
            aggregate,
            policy,
        })
    }
}
