//! Location models for coordinates and raw location queries

use crate::{HazardPlanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated geographic coordinates
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting values outside the valid range
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(HazardPlanError::resolution(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(HazardPlanError::resolution(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Raw location as supplied by a caller
///
/// Accepts either free text (`"Udupi"`, `"13.34,74.74"`) or a
/// two-element numeric pair (`[13.34, 74.74]`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum LocationQuery {
    Pair([f64; 2]),
    Text(String),
}

impl LocationQuery {
    /// Human readable form, used as the location name in results
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            LocationQuery::Pair([lat, lon]) => format!("{lat},{lon}"),
            LocationQuery::Text(text) => text.trim().to_string(),
        }
    }
}

impl From<&str> for LocationQuery {
    fn from(value: &str) -> Self {
        LocationQuery::Text(value.to_string())
    }
}

impl From<String> for LocationQuery {
    fn from(value: String) -> Self {
        LocationQuery::Text(value)
    }
}

impl From<(f64, f64)> for LocationQuery {
    fn from((lat, lon): (f64, f64)) -> Self {
        LocationQuery::Pair([lat, lon])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_range_validation() {
        assert!(Coordinates::new(13.34, 74.74).is_ok());
        assert!(Coordinates::new(90.0, -180.0).is_ok());
        assert!(matches!(
            Coordinates::new(91.0, 0.0),
            Err(HazardPlanError::Resolution { .. })
        ));
        assert!(matches!(
            Coordinates::new(0.0, 180.5),
            Err(HazardPlanError::Resolution { .. })
        ));
    }

    #[test]
    fn test_location_query_deserializes_text_and_pair() {
        let text: LocationQuery = serde_json::from_str("\"Udupi\"").unwrap();
        assert_eq!(text, LocationQuery::Text("Udupi".to_string()));

        let pair: LocationQuery = serde_json::from_str("[13.34, 74.74]").unwrap();
        assert_eq!(pair, LocationQuery::Pair([13.34, 74.74]));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(LocationQuery::from(" Udupi ").display_name(), "Udupi");
        assert_eq!(LocationQuery::from((13.34, 74.74)).display_name(), "13.34,74.74");
    }
}
