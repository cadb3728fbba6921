//! Preparedness workflow plan

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered list of recommended preparedness actions
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkflowPlan {
    pub location: String,
    pub policy: String,
    /// Plan steps in the order they should be presented
    pub plan: Vec<String>,
    pub generated_at: DateTime<Utc>,
}
