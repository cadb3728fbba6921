//! Risk analysis module
//!
//! This module holds the decision logic of the assessment pipeline:
//! - Read-only risk tables (thresholds, weights, keywords, templates)
//! - Threshold comparison of forecast series
//! - Keyword classification of incident history
//! - Keyword hazard detection
//! - Score aggregation

pub mod aggregator;
pub mod classifier;
pub mod comparator;
pub mod keywords;
pub mod tables;

pub use aggregator::ScoreAggregator;
pub use classifier::{HistoryClassifier, KeywordHistoryClassifier};
pub use comparator::{ReducedMetrics, ThresholdComparator};
pub use keywords::{DetectedHazard, HazardDetector, KeywordHazardDetector};
pub use tables::{
    HazardCatalog, HazardDefinition, KeywordTable, Metric, RiskTables, ScoreWeights,
    TemplateCatalog, Threshold,
};
