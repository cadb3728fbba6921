//! Insurance plan catalog, looked up by disaster category

use crate::{HazardPlanError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, info};

const CATALOG_JSON: &str = include_str!("insurance.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDetails {
    pub premium: String,
    pub coverage_amount: String,
    pub policy_duration: String,
    pub waiting_period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsurancePlan {
    pub plan_name: String,
    pub best_for: String,
    pub policy_details: PolicyDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CategoryPlans {
    #[serde(default)]
    insurance_plans: Vec<InsurancePlan>,
}

/// Category (lowercase) to plan records
#[derive(Debug, Clone, Default)]
pub struct InsuranceCatalog {
    categories: BTreeMap<String, Vec<InsurancePlan>>,
}

impl InsuranceCatalog {
    pub fn builtin() -> Result<Self> {
        Self::from_json(CATALOG_JSON)
    }

    /// Load from `path` when given, otherwise the embedded catalog
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let catalog = match path {
            Some(path) => {
                debug!("Reading insurance catalog from {}", path.display());
                Self::from_json(&std::fs::read_to_string(path)?)?
            }
            None => Self::builtin()?,
        };

        info!("Loaded insurance catalog with {} categories", catalog.categories.len());
        Ok(catalog)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, CategoryPlans> =
            serde_json::from_str(content.trim_start_matches('\u{feff}')).map_err(|e| {
                HazardPlanError::configuration(format!("Invalid insurance catalog: {e}"))
            })?;

        let categories = raw
            .into_iter()
            .map(|(category, plans)| (category.trim().to_lowercase(), plans.insurance_plans))
            .collect();

        Ok(Self { categories })
    }

    /// Plans for a category, empty when unknown
    #[must_use]
    pub fn plans_for(&self, category: &str) -> &[InsurancePlan] {
        self.categories
            .get(&category.trim().to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Human readable listing of the plans for a category
    #[must_use]
    pub fn describe(&self, category: &str) -> String {
        let plans = self.plans_for(category);
        if plans.is_empty() {
            return format!("No insurance plans found for '{category}'.");
        }

        let mut out = format!("Recommended insurance plans for '{category}':\n");
        for plan in plans {
            let details = &plan.policy_details;
            let _ = write!(
                out,
                "\n{}\n  Best for: {}\n  Premium: {}\n  Coverage: {}\n  Duration: {}\n  \
                 Waiting period: {}\n",
                plan.plan_name,
                plan.best_for,
                details.premium,
                details.coverage_amount,
                details.policy_duration,
                details.waiting_period
            );
        }
        out
    }
}
