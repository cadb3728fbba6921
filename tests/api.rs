//! HTTP API tests against the router, no sockets involved

mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use common::{FLOOD_HISTORY, StubGeocoder, StubProvider, planner, rainy_series};
use hazardplan::models::RiskLevel;
use hazardplan::{InsurancePlan, PreparednessReport, web};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(provider: StubProvider) -> Router {
    web::app(Arc::new(planner(Arc::new(StubGeocoder::default()), provider)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn post_assessment(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/assessments")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(StubProvider::Failing), get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_assessment_returns_report() {
    let request = post_assessment(json!({
        "location": "13.34,74.74",
        "history": FLOOD_HISTORY,
    }));
    let (status, body) = send(app(StubProvider::Series(rainy_series())), request).await;

    assert_eq!(status, StatusCode::OK);
    let report: PreparednessReport = serde_json::from_slice(&body).unwrap();
    assert_eq!(report.assessment.aggregate.level, RiskLevel::High);
    assert!(report.assessment.weather_analysis.risks_found.contains("flood"));
    assert_eq!(report.insurance_category, "flood");
}

#[tokio::test]
async fn test_assessment_accepts_coordinate_pair() {
    let request = post_assessment(json!({ "location": [13.34, 74.74], "policy": "Gold Cover" }));
    let (status, body) = send(app(StubProvider::Series(rainy_series())), request).await;

    assert_eq!(status, StatusCode::OK);
    let report: PreparednessReport = serde_json::from_slice(&body).unwrap();
    assert_eq!(report.assessment.policy, "Gold Cover");
}

#[tokio::test]
async fn test_unknown_location_is_unprocessable() {
    let request = post_assessment(json!({ "location": "Atlantis" }));
    let (status, body) = send(app(StubProvider::Series(rainy_series())), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("Atlantis"));
}

#[tokio::test]
async fn test_provider_failure_is_bad_gateway() {
    let request = post_assessment(json!({ "location": "13.34,74.74" }));
    let (status, body) = send(app(StubProvider::Failing), request).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("weather forecast"));
}

#[tokio::test]
async fn test_insurance_lookup() {
    let (status, body) = send(app(StubProvider::Failing), get("/api/insurance/Flood")).await;
    assert_eq!(status, StatusCode::OK);
    let plans: Vec<InsurancePlan> = serde_json::from_slice(&body).unwrap();
    assert_eq!(plans.len(), 2);

    let (status, body) = send(app(StubProvider::Failing), get("/api/insurance/cold%20wave")).await;
    assert_eq!(status, StatusCode::OK);
    let plans: Vec<InsurancePlan> = serde_json::from_slice(&body).unwrap();
    assert_eq!(plans[0].plan_name, "Winter Health Rider");

    let (status, body) = send(app(StubProvider::Failing), get("/api/insurance/meteor")).await;
    assert_eq!(status, StatusCode::OK);
    let plans: Vec<InsurancePlan> = serde_json::from_slice(&body).unwrap();
    assert!(plans.is_empty());
}
