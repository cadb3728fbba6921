//! End-to-end tests of the planning pipeline with stubbed collaborators

mod common;

use std::sync::Arc;

use common::{FLOOD_HISTORY, StubGeocoder, StubProvider, planner, rainy_series};
use hazardplan::models::{HistoryRiskLevel, RiskLevel};
use hazardplan::{AssessmentRequest, Coordinates, HazardPlanError, PreparednessReport, RiskTables};
use pretty_assertions::assert_eq;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[tokio::test]
async fn test_flood_scenario_end_to_end() {
    let geocoder = Arc::new(StubGeocoder::default());
    let planner = planner(geocoder.clone(), StubProvider::Series(rainy_series()));

    let request = AssessmentRequest::new("13.34,74.74").with_history(FLOOD_HISTORY);
    let report = planner.plan(&request).await.unwrap();
    let assessment = &report.assessment;

    assert_eq!(geocoder.calls(), 0);
    assert_eq!(assessment.location, "13.34,74.74");
    assert_eq!(assessment.coordinates, Coordinates::new(13.34, 74.74).unwrap());
    assert_eq!(assessment.policy, "Standard Home Insurance");

    let weather = &assessment.weather_analysis;
    let ids: Vec<&str> = weather.risks_found.ids().collect();
    assert_eq!(ids, ["flood"]);
    assert_eq!(weather.risks_found.get("flood").unwrap().metric, Some(60.0));
    assert_close(weather.max_precip_mm, 60.0);
    assert_eq!(weather.max_temp_c, Some(32.0));
    assert_close(weather.max_wind_ms, 11.11);

    assert_eq!(assessment.history_risk, HistoryRiskLevel::High);
    assert_close(assessment.aggregate.history_score, 0.9);
    assert_close(assessment.aggregate.weather_score, 0.6);
    assert_close(assessment.aggregate.score, 0.75);
    assert_eq!(assessment.aggregate.level, RiskLevel::High);

    assert!(report.reported_hazards.is_empty());
    assert_eq!(report.insurance_category, "flood");
    assert_eq!(report.recommended_insurance.len(), 2);
}

#[tokio::test]
async fn test_flood_scenario_plan_layout() {
    let tables = RiskTables::builtin().unwrap();
    let general = &tables.templates.general;
    let flood = tables.templates.steps_for("flood").unwrap();

    let planner = planner(
        Arc::new(StubGeocoder::default()),
        StubProvider::Series(rainy_series()),
    );
    let request = AssessmentRequest::new("13.34,74.74").with_history(FLOOD_HISTORY);
    let plan = planner.plan(&request).await.unwrap().plan.plan;

    let mut expected = general.clone();
    expected.push("--- Flood Risk (metric observed: 60) ---".to_string());
    expected.extend(flood.iter().cloned());
    expected.push(tables.templates.policy_line("Standard Home Insurance"));

    assert_eq!(plan, expected);
}

#[tokio::test]
async fn test_place_name_is_geocoded_once() {
    let geocoder = Arc::new(StubGeocoder::with_match("Udupi", 13.34, 74.74));
    let planner = planner(geocoder.clone(), StubProvider::Series(rainy_series()));

    let report = planner
        .plan(&AssessmentRequest::new("Udupi").with_policy("Gold Cover"))
        .await
        .unwrap();

    assert_eq!(geocoder.calls(), 1);
    assert_eq!(report.assessment.location, "Udupi");
    assert_eq!(report.assessment.policy, "Gold Cover");
    assert!(report.plan.plan.last().unwrap().contains("'Gold Cover'"));
    assert_eq!(report.assessment.history_risk, HistoryRiskLevel::Low);
    assert_close(report.assessment.aggregate.score, 0.35);
    assert_eq!(report.assessment.aggregate.level, RiskLevel::Low);
}

#[tokio::test]
async fn test_empty_geocoding_is_resolution_error() {
    let planner = planner(
        Arc::new(StubGeocoder::default()),
        StubProvider::Series(rainy_series()),
    );
    let result = planner.plan(&AssessmentRequest::new("Atlantis")).await;
    assert!(matches!(result, Err(HazardPlanError::Resolution { .. })));
}

#[tokio::test]
async fn test_invalid_coordinates_are_resolution_errors() {
    let planner = planner(
        Arc::new(StubGeocoder::default()),
        StubProvider::Series(rainy_series()),
    );
    for location in ["95,10", "13.34", ""] {
        let result = planner.plan(&AssessmentRequest::new(location)).await;
        assert!(
            matches!(result, Err(HazardPlanError::Resolution { .. })),
            "{location:?} should not resolve"
        );
    }
}

#[tokio::test]
async fn test_provider_failure_propagates() {
    let planner = planner(Arc::new(StubGeocoder::default()), StubProvider::Failing);
    let result = planner.plan(&AssessmentRequest::new((13.34, 74.74))).await;
    assert!(matches!(result, Err(HazardPlanError::Provider { .. })));
}

#[tokio::test]
async fn test_exported_report_round_trips() {
    let planner = planner(
        Arc::new(StubGeocoder::default()),
        StubProvider::Series(rainy_series()),
    );
    let request = AssessmentRequest::new("13.34,74.74").with_history(FLOOD_HISTORY);
    let report = planner.plan(&request).await.unwrap();

    let path = std::env::temp_dir()
        .join(format!("hazardplan-{}", std::process::id()))
        .join("report.json");
    report.write_to(&path).unwrap();
    let restored = PreparednessReport::read_from(&path).unwrap();
    let _ = std::fs::remove_dir_all(path.parent().unwrap());

    assert_eq!(restored, report);
}

#[tokio::test]
async fn test_findings_serialize_in_discovery_order() {
    let stormy = hazardplan::ForecastSeries::from_daily(&[80.0], &[41.0], &[30.0], &[60.0]);
    let planner = planner(Arc::new(StubGeocoder::default()), StubProvider::Series(stormy));
    let report = planner.plan(&AssessmentRequest::new("1,1")).await.unwrap();

    let json = serde_json::to_string(&report.assessment.weather_analysis.risks_found).unwrap();
    let flood = json.find("\"flood\"").unwrap();
    let storm = json.find("\"storm\"").unwrap();
    let heat = json.find("\"heatwave\"").unwrap();
    assert!(flood < storm && storm < heat, "unexpected order in {json}");
    assert_close(report.assessment.aggregate.weather_score, 1.0);
}
