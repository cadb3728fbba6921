//! Stub collaborators shared by the integration tests
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use hazardplan::models::{Coordinates, ForecastSeries};
use hazardplan::{
    GeocodeCandidate, Geocoder, HazardPlanError, InsuranceCatalog, PreparednessPlanner, Result,
    RiskAssessmentEngine, RiskTables, WeatherProvider,
};

pub const FLOOD_HISTORY: &str = "my house flooded last year, evacuated";

#[derive(Default)]
pub struct StubGeocoder {
    pub candidates: Vec<GeocodeCandidate>,
    pub calls: AtomicUsize,
}

impl StubGeocoder {
    pub fn with_match(name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            candidates: vec![GeocodeCandidate {
                name: name.to_string(),
                latitude,
                longitude,
                country: None,
            }],
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, _name: &str) -> Result<Vec<GeocodeCandidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.candidates.clone())
    }
}

pub enum StubProvider {
    Series(ForecastSeries),
    Failing,
}

#[async_trait]
impl WeatherProvider for StubProvider {
    async fn daily_forecast(
        &self,
        _coordinates: Coordinates,
        _start: NaiveDate,
        _days: u32,
    ) -> Result<ForecastSeries> {
        match self {
            StubProvider::Series(series) => Ok(series.clone()),
            StubProvider::Failing => Err(HazardPlanError::provider("HTTP 503 Service Unavailable")),
        }
    }
}

/// Forecast from the reference scenario: heavy rain on day one only
pub fn rainy_series() -> ForecastSeries {
    ForecastSeries::from_daily(
        &[60.0, 10.0, 5.0],
        &[30.0, 32.0, 31.0],
        &[24.0, 25.0, 24.0],
        &[40.0, 20.0, 10.0],
    )
}

pub fn planner(geocoder: Arc<StubGeocoder>, provider: StubProvider) -> PreparednessPlanner {
    let tables = RiskTables::builtin().unwrap();
    let engine = RiskAssessmentEngine::new(geocoder, Arc::new(provider), &tables);
    PreparednessPlanner::new(engine, &tables, Arc::new(InsuranceCatalog::builtin().unwrap()))
}
