//! Read-only risk tables
//!
//! Hazard thresholds, score weights, keyword maps, history rules and workflow
//! templates ship embedded as JSON. A directory may override any of them file
//! by file. Tables are loaded once, validated, and shared behind `Arc`.

use crate::{HazardPlanError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const THRESHOLDS_JSON: &str = include_str!("tables/thresholds.json");
const WEIGHTS_JSON: &str = include_str!("tables/weights.json");
const KEYWORDS_JSON: &str = include_str!("tables/keywords.json");
const HISTORY_JSON: &str = include_str!("tables/history.json");
const TEMPLATES_JSON: &str = include_str!("tables/templates.json");

/// Reduced forecast metric a threshold compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    /// Maximum daily precipitation sum, mm
    #[serde(rename = "precipitation_sum_mm")]
    PrecipitationSumMm,
    /// Maximum daily wind speed, m/s
    #[serde(rename = "wind_speed_ms")]
    WindSpeedMs,
    /// Maximum daily temperature, Celsius
    #[serde(rename = "temperature_c")]
    TemperatureC,
}

/// Inclusive lower cutoff on a metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub metric: Metric,
    pub cutoff: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardDefinition {
    pub id: String,
    pub label: String,
    /// Hazards without a threshold can only be surfaced from text
    #[serde(default)]
    pub threshold: Option<Threshold>,
}

/// Known hazards in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HazardCatalog(Vec<HazardDefinition>);

impl HazardCatalog {
    #[must_use]
    pub fn new(hazards: Vec<HazardDefinition>) -> Self {
        Self(hazards)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HazardDefinition> {
        self.0.iter()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&HazardDefinition> {
        self.0.iter().find(|h| h.id == id)
    }

    /// Display label for a hazard, falling back to the id
    #[must_use]
    pub fn label_for<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map_or(id, |h| h.label.as_str())
    }

    #[must_use]
    pub fn has_threshold(&self, id: &str) -> bool {
        self.get(id).is_some_and(|h| h.threshold.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryScores {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

/// Inclusive lower bounds of the aggregate levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelCutoffs {
    pub high: f64,
    pub medium: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub history: HistoryScores,
    /// Per-hazard weather weight; unlisted hazards weigh 0
    pub hazards: HashMap<String, f64>,
    #[serde(default = "default_weather_cap")]
    pub weather_cap: f64,
    pub levels: LevelCutoffs,
}

fn default_weather_cap() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCategory {
    /// Category name, also the insurance catalog key
    pub category: String,
    /// Hazard id this category surfaces
    pub hazard: String,
    pub keywords: Vec<String>,
}

/// Keyword categories in match-priority order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordTable(Vec<KeywordCategory>);

impl KeywordTable {
    #[must_use]
    pub fn new(categories: Vec<KeywordCategory>) -> Self {
        Self(categories)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeywordCategory> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryBucket {
    pub name: String,
    pub points: u32,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRules {
    pub buckets: Vec<HistoryBucket>,
    pub high_at: u32,
    pub medium_at: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateCatalog {
    /// Baseline block that opens every plan
    pub general: Vec<String>,
    /// Placeholder step for an empty finding set
    pub no_risk: String,
    /// Step used for hazards without a template, when configured
    pub missing_template: String,
    /// Advisory closing every plan; `{policy}` is replaced by the policy name
    pub policy_note: String,
    pub hazards: HashMap<String, Vec<String>>,
}

impl TemplateCatalog {
    #[must_use]
    pub fn steps_for(&self, hazard: &str) -> Option<&[String]> {
        self.hazards.get(hazard).map(Vec::as_slice)
    }

    #[must_use]
    pub fn policy_line(&self, policy: &str) -> String {
        self.policy_note.replace("{policy}", policy)
    }
}

/// All process-wide tables
#[derive(Debug, Clone)]
pub struct RiskTables {
    pub hazards: Arc<HazardCatalog>,
    pub weights: Arc<ScoreWeights>,
    pub keywords: Arc<KeywordTable>,
    pub history: Arc<HistoryRules>,
    pub templates: Arc<TemplateCatalog>,
}

impl RiskTables {
    /// Embedded tables only
    pub fn builtin() -> Result<Self> {
        Self::load(None)
    }

    /// Load tables, preferring files in `directory` over the embedded copies
    pub fn load(directory: Option<&Path>) -> Result<Self> {
        let tables = Self {
            hazards: Arc::new(read_table(directory, "thresholds.json", THRESHOLDS_JSON)?),
            weights: Arc::new(read_table(directory, "weights.json", WEIGHTS_JSON)?),
            keywords: Arc::new(read_table(directory, "keywords.json", KEYWORDS_JSON)?),
            history: Arc::new(read_table(directory, "history.json", HISTORY_JSON)?),
            templates: Arc::new(read_table(directory, "templates.json", TEMPLATES_JSON)?),
        };
        tables.validate()?;

        info!(
            "Loaded risk tables: {} hazards, {} keyword categories, {} templates",
            tables.hazards.0.len(),
            tables.keywords.0.len(),
            tables.templates.hazards.len()
        );
        Ok(tables)
    }

    /// Check cross-table references and value ranges
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for hazard in self.hazards.iter() {
            if !seen.insert(hazard.id.as_str()) {
                return Err(HazardPlanError::configuration(format!(
                    "Hazard '{}' is defined twice in the threshold table",
                    hazard.id
                )));
            }
            if let Some(threshold) = &hazard.threshold {
                if !threshold.cutoff.is_finite() {
                    return Err(HazardPlanError::configuration(format!(
                        "Hazard '{}' has a non-finite cutoff",
                        hazard.id
                    )));
                }
            }
        }

        for category in self.keywords.iter() {
            if self.hazards.get(&category.hazard).is_none() {
                return Err(HazardPlanError::configuration(format!(
                    "Keyword category '{}' refers to unknown hazard '{}'",
                    category.category, category.hazard
                )));
            }
        }

        let history = &self.weights.history;
        for score in [history.low, history.medium, history.high] {
            if !(0.0..=1.0).contains(&score) {
                return Err(HazardPlanError::configuration(format!(
                    "History score {score} is outside [0, 1]"
                )));
            }
        }

        if self.weights.levels.medium > self.weights.levels.high {
            return Err(HazardPlanError::configuration(
                "Medium level cutoff cannot exceed the high level cutoff",
            ));
        }

        if self.history.medium_at > self.history.high_at {
            return Err(HazardPlanError::configuration(
                "History medium score cannot exceed the high score",
            ));
        }

        if self.templates.general.is_empty() {
            return Err(HazardPlanError::configuration(
                "Template catalog has no general preparedness block",
            ));
        }

        if !self.templates.policy_note.contains("{policy}") {
            return Err(HazardPlanError::configuration(
                "Policy note template must contain a {policy} placeholder",
            ));
        }

        Ok(())
    }
}

fn read_table<T: DeserializeOwned>(
    directory: Option<&Path>,
    file_name: &str,
    embedded: &str,
) -> Result<T> {
    let override_path = directory
        .map(|dir| dir.join(file_name))
        .filter(|path| path.exists());

    let (source, content) = match override_path {
        Some(path) => {
            debug!("Reading table override from {}", path.display());
            (path.display().to_string(), std::fs::read_to_string(&path)?)
        }
        None => ("embedded".to_string(), embedded.to_string()),
    };

    serde_json::from_str(content.trim_start_matches('\u{feff}')).map_err(|e| {
        HazardPlanError::configuration(format!("Invalid table {file_name} ({source}): {e}"))
    })
}
