//! Keyword hazard detection over free text

use super::tables::KeywordTable;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Category matched in a piece of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedHazard {
    /// Category name, e.g. `thunderstorm`
    pub category: String,
    /// Hazard id the category maps to, e.g. `storm`
    pub hazard: String,
    /// Keyword that matched
    pub keyword: String,
}

/// Finds the hazard category a text talks about
pub trait HazardDetector: Send + Sync {
    fn detect(&self, text: &str) -> Option<DetectedHazard>;
}

/// First-match scan over the ordered keyword table
#[derive(Debug, Clone)]
pub struct KeywordHazardDetector {
    table: Arc<KeywordTable>,
}

impl KeywordHazardDetector {
    #[must_use]
    pub fn new(table: Arc<KeywordTable>) -> Self {
        Self { table }
    }
}

impl HazardDetector for KeywordHazardDetector {
    fn detect(&self, text: &str) -> Option<DetectedHazard> {
        let text = text.to_lowercase();
        self.table.iter().find_map(|category| {
            category
                .keywords
                .iter()
                .find(|keyword| text.contains(keyword.as_str()))
                .map(|keyword| DetectedHazard {
                    category: category.category.clone(),
                    hazard: category.hazard.clone(),
                    keyword: keyword.clone(),
                })
        })
    }
}
