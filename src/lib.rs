//! `HazardPlan` - Location-specific disaster risk assessment
//!
//! This library combines short-range weather forecasts with reported incident
//! history into a normalized risk score, and turns the detected hazards into
//! an ordered preparedness plan with matching insurance options.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod insurance;
pub mod location_resolver;
pub mod models;
pub mod planner;
pub mod risk;
pub mod telemetry;
pub mod weather;
pub mod web;
pub mod workflow;

// Re-export core types for public API
pub use config::HazardPlanConfig;
pub use engine::{AssessmentRequest, RiskAssessmentEngine};
pub use error::HazardPlanError;
pub use insurance::{InsuranceCatalog, InsurancePlan};
pub use location_resolver::{LocationInput, LocationParser, LocationResolver};
pub use models::{AssessmentResult, Coordinates, ForecastSeries, LocationQuery, WorkflowPlan};
pub use planner::{PreparednessPlanner, PreparednessReport};
pub use risk::RiskTables;
pub use weather::{GeocodeCandidate, Geocoder, OpenMeteoClient, WeatherProvider};
pub use workflow::{UnknownHazardPolicy, WorkflowSynthesizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, HazardPlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
