//! JSON API over the preparedness planner

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::json;
use tracing::{info, warn};

use crate::HazardPlanError;
use crate::engine::AssessmentRequest;
use crate::insurance::InsurancePlan;
use crate::planner::{PreparednessPlanner, PreparednessReport};

#[derive(Clone)]
pub struct AppState {
    planner: Arc<PreparednessPlanner>,
}

pub fn router(planner: Arc<PreparednessPlanner>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/assessments", post(create_assessment))
        .route("/insurance/{category}", get(get_insurance))
        .with_state(AppState { planner })
}

/// Error body `{"error": <user message>}` with a status per error kind
pub struct ApiError(HazardPlanError);

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.0 {
            HazardPlanError::Resolution { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            HazardPlanError::Provider { .. } => StatusCode::BAD_GATEWAY,
            HazardPlanError::Configuration { .. }
            | HazardPlanError::Io { .. }
            | HazardPlanError::Serialization { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<HazardPlanError> for ApiError {
    fn from(err: HazardPlanError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!("Request failed with {}: {}", status, self.0);
        (status, Json(json!({ "error": self.0.user_message() }))).into_response()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn create_assessment(
    State(state): State<AppState>,
    Json(request): Json<AssessmentRequest>,
) -> Result<Json<PreparednessReport>, ApiError> {
    info!("Assessment requested for {}", request.location.display_name());
    let report = state.planner.plan(&request).await?;
    Ok(Json(report))
}

async fn get_insurance(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<Vec<InsurancePlan>> {
    Json(state.planner.insurance().plans_for(&category).to_vec())
}
