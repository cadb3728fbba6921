//! Assessment models: hazard findings, risk levels, scores and results

use super::Coordinates;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Coarse risk level derived from incident history text
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRiskLevel {
    Low,
    Medium,
    High,
}

impl HistoryRiskLevel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryRiskLevel::Low => "low",
            HistoryRiskLevel::Medium => "medium",
            HistoryRiskLevel::High => "high",
        }
    }
}

impl fmt::Display for HistoryRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall risk level of an aggregate score
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(name)
    }
}

/// A hazard whose detection condition was satisfied
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HazardFinding {
    /// Hazard id, e.g. `flood`
    #[serde(default)]
    pub hazard: String,
    /// Display label, e.g. `Flood Risk`
    pub label: String,
    /// Observed value that crossed the threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

impl HazardFinding {
    /// Finding produced by a numeric threshold
    #[must_use]
    pub fn measured(hazard: &str, label: &str, metric: f64) -> Self {
        Self {
            hazard: hazard.to_string(),
            label: label.to_string(),
            metric: Some(metric),
            severity: None,
        }
    }

    /// Finding surfaced from user text, without a measurement
    #[must_use]
    pub fn reported(hazard: &str, label: &str) -> Self {
        Self {
            hazard: hazard.to_string(),
            label: label.to_string(),
            metric: None,
            severity: Some("reported".to_string()),
        }
    }
}

/// Insertion-ordered set of findings keyed by hazard id
///
/// Serializes as a JSON object whose key order is discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HazardFindings(Vec<HazardFinding>);

impl HazardFindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finding; returns `false` and keeps the existing entry if the id is taken
    pub fn insert(&mut self, finding: HazardFinding) -> bool {
        if self.contains(&finding.hazard) {
            return false;
        }
        self.0.push(finding);
        true
    }

    #[must_use]
    pub fn contains(&self, hazard: &str) -> bool {
        self.0.iter().any(|f| f.hazard == hazard)
    }

    #[must_use]
    pub fn get(&self, hazard: &str) -> Option<&HazardFinding> {
        self.0.iter().find(|f| f.hazard == hazard)
    }

    #[must_use]
    pub fn first(&self) -> Option<&HazardFinding> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HazardFinding> {
        self.0.iter()
    }

    /// Hazard ids in discovery order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|f| f.hazard.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a HazardFindings {
    type Item = &'a HazardFinding;
    type IntoIter = std::slice::Iter<'a, HazardFinding>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<HazardFinding> for HazardFindings {
    fn from_iter<I: IntoIterator<Item = HazardFinding>>(iter: I) -> Self {
        let mut findings = HazardFindings::new();
        for finding in iter {
            findings.insert(finding);
        }
        findings
    }
}

impl Serialize for HazardFindings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for finding in &self.0 {
            map.serialize_entry(&finding.hazard, finding)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for HazardFindings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FindingsVisitor;

        impl<'de> Visitor<'de> for FindingsVisitor {
            type Value = HazardFindings;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of hazard id to finding")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut findings = HazardFindings::new();
                while let Some((hazard, mut finding)) =
                    access.next_entry::<String, HazardFinding>()?
                {
                    finding.hazard = hazard;
                    findings.insert(finding);
                }
                Ok(findings)
            }
        }

        deserializer.deserialize_map(FindingsVisitor)
    }
}

/// Reduced forecast metrics plus the hazards they triggered
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherAnalysis {
    pub max_precip_mm: f64,
    pub max_temp_c: Option<f64>,
    /// Maximum wind in m/s, rounded to 2 decimals
    pub max_wind_ms: f64,
    pub risks_found: HazardFindings,
}

/// Combined history and weather score
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AggregateScore {
    /// Normalized score in [0, 1], rounded to 2 decimals
    pub score: f64,
    pub level: RiskLevel,
    pub history_score: f64,
    pub weather_score: f64,
}

/// Output of the risk assessment pipeline
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AssessmentResult {
    /// Location as the caller supplied it
    pub location: String,
    pub coordinates: Coordinates,
    pub history_risk: HistoryRiskLevel,
    pub weather_analysis: WeatherAnalysis,
    pub aggregate: AggregateScore,
    pub policy: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_findings_reject_duplicate_ids() {
        let mut findings = HazardFindings::new();
        assert!(findings.insert(HazardFinding::measured("flood", "Flood Risk", 60.0)));
        assert!(!findings.insert(HazardFinding::measured("flood", "Flood Risk", 80.0)));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings.get("flood").unwrap().metric, Some(60.0));
    }

    #[test]
    fn test_findings_serialize_in_discovery_order() {
        let findings: HazardFindings = vec![
            HazardFinding::measured("storm", "Storm / Cyclone Risk", 16.5),
            HazardFinding::measured("flood", "Flood Risk", 60.0),
            HazardFinding::reported("tsunami", "Tsunami Risk"),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&findings).unwrap();
        let storm = json.find("\"storm\"").unwrap();
        let flood = json.find("\"flood\"").unwrap();
        let tsunami = json.find("\"tsunami\"").unwrap();
        assert!(storm < flood && flood < tsunami);

        let parsed: HazardFindings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, findings);
        assert_eq!(parsed.ids().collect::<Vec<_>>(), ["storm", "flood", "tsunami"]);
    }

    #[test]
    fn test_finding_key_wins_over_missing_body_id() {
        let parsed: HazardFindings =
            serde_json::from_str(r#"{"heatwave": {"label": "Heatwave Risk", "metric": 41.0}}"#)
                .unwrap();
        let finding = parsed.first().unwrap();
        assert_eq!(finding.hazard, "heatwave");
        assert_eq!(finding.severity, None);
    }

    #[test]
    fn test_level_serialization() {
        assert_eq!(serde_json::to_string(&HistoryRiskLevel::High).unwrap(), "\"high\"");
        assert_eq!(serde_json::to_string(&RiskLevel::Medium).unwrap(), "\"Medium\"");
    }
}
