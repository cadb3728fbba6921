//! Threshold comparison of a forecast series against the hazard table

use super::tables::{HazardCatalog, Metric};
use crate::models::{ForecastSeries, HazardFinding, HazardFindings, WeatherAnalysis};
use std::sync::Arc;
use tracing::debug;

/// Provider wind speeds are km/h; thresholds are m/s
pub const KMH_PER_MS: f64 = 3.6;

/// Round to two decimal places
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Forecast series reduced to horizon maxima
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReducedMetrics {
    pub max_precip_mm: f64,
    /// `None` when the provider sent no temperatures
    pub max_temp_c: Option<f64>,
    /// Unrounded, already converted to m/s
    pub max_wind_ms: f64,
}

impl ReducedMetrics {
    #[must_use]
    pub fn from_series(series: &ForecastSeries) -> Self {
        let max_precip_mm = ForecastSeries::max_of(&series.precipitation_sum_mm).unwrap_or(0.0);
        let max_temp_c = ForecastSeries::max_of(&series.temperature_max_c);
        let max_wind_ms =
            ForecastSeries::max_of(&series.wind_speed_max_kmh).map_or(0.0, |kmh| kmh / KMH_PER_MS);

        Self {
            max_precip_mm,
            max_temp_c,
            max_wind_ms,
        }
    }

    /// Value of a metric, `None` if it is undefined for this forecast
    #[must_use]
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::PrecipitationSumMm => Some(self.max_precip_mm),
            Metric::WindSpeedMs => Some(self.max_wind_ms),
            Metric::TemperatureC => self.max_temp_c,
        }
    }

    /// Value as reported in a finding
    fn reported(metric: Metric, value: f64) -> f64 {
        match metric {
            Metric::WindSpeedMs => round2(value),
            Metric::PrecipitationSumMm | Metric::TemperatureC => value,
        }
    }
}

/// Turns forecasts into hazard findings using the threshold table
#[derive(Debug, Clone)]
pub struct ThresholdComparator {
    hazards: Arc<HazardCatalog>,
}

impl ThresholdComparator {
    #[must_use]
    pub fn new(hazards: Arc<HazardCatalog>) -> Self {
        Self { hazards }
    }

    /// Compare the reduced forecast against every hazard with a threshold
    #[must_use]
    pub fn compare(&self, series: &ForecastSeries) -> WeatherAnalysis {
        let metrics = ReducedMetrics::from_series(series);
        debug!("Reduced forecast metrics: {:?}", metrics);

        let mut risks_found = HazardFindings::new();
        for hazard in self.hazards.iter() {
            let Some(threshold) = &hazard.threshold else {
                continue;
            };
            let Some(value) = metrics.value(threshold.metric) else {
                continue;
            };

            if value >= threshold.cutoff {
                debug!(
                    "Hazard {} triggered: {} >= {}",
                    hazard.id, value, threshold.cutoff
                );
                risks_found.insert(HazardFinding::measured(
                    &hazard.id,
                    &hazard.label,
                    ReducedMetrics::reported(threshold.metric, value),
                ));
            }
        }

        WeatherAnalysis {
            max_precip_mm: metrics.max_precip_mm,
            max_temp_c: metrics.max_temp_c,
            max_wind_ms: round2(metrics.max_wind_ms),
            risks_found,
        }
    }
}
