//! Preparedness planner
//!
//! Runs an assessment, enriches the findings with hazards reported in the
//! incident history, picks insurance plans and synthesizes the workflow into
//! one exportable [`PreparednessReport`].

use crate::config::HazardPlanConfig;
use crate::engine::{AssessmentRequest, RiskAssessmentEngine};
use crate::insurance::{InsuranceCatalog, InsurancePlan};
use crate::models::{AssessmentResult, HazardFinding, HazardFindings, WorkflowPlan};
use crate::risk::{
    HazardCatalog, HazardDetector, KeywordHazardDetector, RiskTables, TemplateCatalog,
};
use crate::weather::OpenMeteoClient;
use crate::workflow::{UnknownHazardPolicy, WorkflowSynthesizer};
use crate::Result;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_INSURANCE_CATEGORY: &str = "flood";

/// Exported result of one planning request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparednessReport {
    pub assessment: AssessmentResult,
    pub plan: WorkflowPlan,
    /// Hazards surfaced from the history text only; not part of the score
    pub reported_hazards: HazardFindings,
    pub insurance_category: String,
    pub recommended_insurance: Vec<InsurancePlan>,
}

impl PreparednessReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        info!("Wrote preparedness report to {}", path.display());
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

pub struct PreparednessPlanner {
    engine: RiskAssessmentEngine,
    detector: Arc<dyn HazardDetector>,
    hazards: Arc<HazardCatalog>,
    templates: Arc<TemplateCatalog>,
    synthesizer: WorkflowSynthesizer,
    insurance: Arc<InsuranceCatalog>,
    default_insurance_category: String,
}

impl PreparednessPlanner {
    #[must_use]
    pub fn new(
        engine: RiskAssessmentEngine,
        tables: &RiskTables,
        insurance: Arc<InsuranceCatalog>,
    ) -> Self {
        Self {
            engine,
            detector: Arc::new(KeywordHazardDetector::new(tables.keywords.clone())),
            hazards: tables.hazards.clone(),
            templates: tables.templates.clone(),
            synthesizer: WorkflowSynthesizer::new(
                tables.templates.clone(),
                UnknownHazardPolicy::default(),
            ),
            insurance,
            default_insurance_category: DEFAULT_INSURANCE_CATEGORY.to_string(),
        }
    }

    /// Planner wired to Open-Meteo with tables and catalog from configuration
    pub fn from_config(config: &HazardPlanConfig) -> Result<Self> {
        let tables = RiskTables::load(config.tables.directory.as_deref())?;
        let insurance = InsuranceCatalog::load(config.insurance.catalog_path.as_deref())?;
        let client = Arc::new(OpenMeteoClient::from_config(config)?);

        let engine = RiskAssessmentEngine::new(client.clone(), client, &tables)
            .with_horizon_days(config.weather.horizon_days)
            .with_default_policy(config.defaults.policy.clone());

        Ok(Self::new(engine, &tables, Arc::new(insurance))
            .with_unknown_hazard_policy(config.tables.unknown_hazard)
            .with_default_insurance_category(config.defaults.insurance_category.clone()))
    }

    #[must_use]
    pub fn with_unknown_hazard_policy(mut self, policy: UnknownHazardPolicy) -> Self {
        self.synthesizer = WorkflowSynthesizer::new(self.templates.clone(), policy);
        self
    }

    #[must_use]
    pub fn with_default_insurance_category(mut self, category: impl Into<String>) -> Self {
        self.default_insurance_category = category.into();
        self
    }

    #[must_use]
    pub fn with_detector(mut self, detector: Arc<dyn HazardDetector>) -> Self {
        self.detector = detector;
        self
    }

    #[must_use]
    pub fn insurance(&self) -> &InsuranceCatalog {
        &self.insurance
    }

    pub async fn plan(&self, request: &AssessmentRequest) -> Result<PreparednessReport> {
        self.plan_from(request, Utc::now().date_naive()).await
    }

    pub async fn plan_from(
        &self,
        request: &AssessmentRequest,
        start: NaiveDate,
    ) -> Result<PreparednessReport> {
        let assessment = self.engine.assess_from(request, start).await?;
        let detected = self.detector.detect(request.history_text());

        let mut findings = assessment.weather_analysis.risks_found.clone();
        let mut reported_hazards = HazardFindings::new();
        if let Some(detected) = &detected {
            debug!(
                "History mentions '{}' ({})",
                detected.keyword, detected.category
            );
            if !self.hazards.has_threshold(&detected.hazard) && !findings.contains(&detected.hazard)
            {
                let finding = HazardFinding::reported(
                    &detected.hazard,
                    self.hazards.label_for(&detected.hazard),
                );
                findings.insert(finding.clone());
                reported_hazards.insert(finding);
            }
        }

        let insurance_category = match (&detected, findings.first()) {
            (Some(detected), _) => detected.category.clone(),
            (None, Some(first)) => first.hazard.clone(),
            (None, None) => self.default_insurance_category.clone(),
        };
        let recommended_insurance = self.insurance.plans_for(&insurance_category).to_vec();

        let plan = self
            .synthesizer
            .synthesize(&assessment.location, &assessment.policy, &findings);

        info!(
            "Plan ready: {} steps, insurance category '{}' ({} plans)",
            plan.plan.len(),
            insurance_category,
            recommended_insurance.len()
        );

        Ok(PreparednessReport {
            assessment,
            plan,
            reported_hazards,
            insurance_category,
            recommended_insurance,
        })
    }
}
