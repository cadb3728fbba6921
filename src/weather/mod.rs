//! Weather and geocoding collaborators
//!
//! The pipeline only talks to these traits; [`open_meteo::OpenMeteoClient`]
//! is the production implementation of both.

use crate::Result;
use crate::models::{Coordinates, ForecastSeries};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// One geocoding match, best match first in provider order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
}

/// Place name to coordinate candidates
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, name: &str) -> Result<Vec<GeocodeCandidate>>;
}

/// Daily forecast for `days` days starting at `start`
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn daily_forecast(
        &self,
        coordinates: Coordinates,
        start: NaiveDate,
        days: u32,
    ) -> Result<ForecastSeries>;
}
