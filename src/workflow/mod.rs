//! Preparedness workflow synthesis
//!
//! Builds the ordered action list for a set of hazard findings: the general
//! baseline block first, one header plus template block per finding in
//! discovery order, and a closing policy advisory.

use crate::models::{HazardFinding, HazardFindings, WorkflowPlan};
use crate::risk::TemplateCatalog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Handling of findings whose hazard has no template block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownHazardPolicy {
    /// Leave the finding out of the plan
    #[default]
    Skip,
    /// Emit the header followed by a generic "no specific steps" line
    Generic,
}

#[derive(Debug, Clone)]
pub struct WorkflowSynthesizer {
    templates: Arc<TemplateCatalog>,
    unknown_hazard: UnknownHazardPolicy,
}

impl WorkflowSynthesizer {
    #[must_use]
    pub fn new(templates: Arc<TemplateCatalog>, unknown_hazard: UnknownHazardPolicy) -> Self {
        Self {
            templates,
            unknown_hazard,
        }
    }

    /// Build the plan, stamped with the current time
    #[must_use]
    pub fn synthesize(
        &self,
        location: &str,
        policy: &str,
        findings: &HazardFindings,
    ) -> WorkflowPlan {
        self.synthesize_at(location, policy, findings, Utc::now())
    }

    #[must_use]
    pub fn synthesize_at(
        &self,
        location: &str,
        policy: &str,
        findings: &HazardFindings,
        generated_at: DateTime<Utc>,
    ) -> WorkflowPlan {
        let mut plan = self.templates.general.clone();

        if findings.is_empty() {
            plan.push(self.templates.no_risk.clone());
        }

        for finding in findings {
            match self.templates.steps_for(&finding.hazard) {
                Some(steps) => {
                    plan.push(Self::header(finding));
                    plan.extend(steps.iter().cloned());
                }
                None => match self.unknown_hazard {
                    UnknownHazardPolicy::Skip => {
                        debug!("No template for hazard {}, skipping", finding.hazard);
                    }
                    UnknownHazardPolicy::Generic => {
                        plan.push(Self::header(finding));
                        plan.push(self.templates.missing_template.clone());
                    }
                },
            }
        }

        plan.push(self.templates.policy_line(policy));

        WorkflowPlan {
            location: location.to_string(),
            policy: policy.to_string(),
            plan,
            generated_at,
        }
    }

    /// Section header naming the hazard and what was observed
    #[must_use]
    pub fn header(finding: &HazardFinding) -> String {
        match (&finding.metric, &finding.severity) {
            (Some(metric), _) => format!("--- {} (metric observed: {metric}) ---", finding.label),
            (None, Some(severity)) => format!("--- {} (severity: {severity}) ---", finding.label),
            (None, None) => format!("--- {} (metric observed: N/A) ---", finding.label),
        }
    }
}
