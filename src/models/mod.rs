//! Data models for the `HazardPlan` application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Coordinates and the raw location query
//! - Forecast: Daily forecast series for the assessment horizon
//! - Assessment: Hazard findings, history levels, scores and the assessment result
//! - Plan: The synthesized preparedness workflow

pub mod assessment;
pub mod forecast;
pub mod location;
pub mod plan;

// Re-export all public types for convenient access
pub use assessment::{
    AggregateScore, AssessmentResult, HazardFinding, HazardFindings, HistoryRiskLevel, RiskLevel,
    WeatherAnalysis,
};
pub use forecast::ForecastSeries;
pub use location::{Coordinates, LocationQuery};
pub use plan::WorkflowPlan;
