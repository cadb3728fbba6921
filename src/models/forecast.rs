//! Daily forecast series for the assessment horizon

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-day forecast arrays, aligned by index with `dates`
///
/// Arrays the provider left out are empty and individual missing days are
/// `None`; reductions skip both.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ForecastSeries {
    pub dates: Vec<NaiveDate>,
    /// Daily precipitation sum in mm
    pub precipitation_sum_mm: Vec<Option<f64>>,
    /// Daily maximum temperature in Celsius
    pub temperature_max_c: Vec<Option<f64>>,
    /// Daily minimum temperature in Celsius
    pub temperature_min_c: Vec<Option<f64>>,
    /// Daily maximum wind speed in km/h, as delivered by the provider
    pub wind_speed_max_kmh: Vec<Option<f64>>,
}

impl ForecastSeries {
    /// Build a series from complete daily values
    #[must_use]
    pub fn from_daily(
        precipitation_sum_mm: &[f64],
        temperature_max_c: &[f64],
        temperature_min_c: &[f64],
        wind_speed_max_kmh: &[f64],
    ) -> Self {
        let wrap = |values: &[f64]| values.iter().copied().map(Some).collect::<Vec<_>>();
        Self {
            dates: Vec::new(),
            precipitation_sum_mm: wrap(precipitation_sum_mm),
            temperature_max_c: wrap(temperature_max_c),
            temperature_min_c: wrap(temperature_min_c),
            wind_speed_max_kmh: wrap(wind_speed_max_kmh),
        }
    }

    /// Number of forecast days covered by the longest array
    #[must_use]
    pub fn horizon(&self) -> usize {
        [
            self.dates.len(),
            self.precipitation_sum_mm.len(),
            self.temperature_max_c.len(),
            self.temperature_min_c.len(),
            self.wind_speed_max_kmh.len(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Largest defined value of a series, `None` when nothing is defined
    #[must_use]
    pub fn max_of(values: &[Option<f64>]) -> Option<f64> {
        values
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }
}
