//! Location Resolution Module
//!
//! Turns a raw [`LocationQuery`] into validated [`Coordinates`]. Numeric
//! input is parsed locally; anything else goes to the geocoder, which is
//! called at most once per resolution.

use crate::models::{Coordinates, LocationQuery};
use crate::weather::Geocoder;
use crate::{HazardPlanError, Result};
use tracing::{debug, warn};

/// Parsed form of a location query
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    Coordinates(Coordinates),
    PlaceName(String),
    /// Unusable input, with the reason
    Invalid(String),
}

pub struct LocationParser;

impl LocationParser {
    #[must_use]
    pub fn parse(query: &LocationQuery) -> LocationInput {
        match query {
            LocationQuery::Pair([lat, lon]) => Self::from_pair(*lat, *lon),
            LocationQuery::Text(text) => Self::parse_text(text),
        }
    }

    fn parse_text(text: &str) -> LocationInput {
        let text = text.trim();
        if text.is_empty() {
            return LocationInput::Invalid("Location cannot be empty".to_string());
        }

        if !Self::looks_numeric(text) {
            return LocationInput::PlaceName(text.to_string());
        }

        let parts: Vec<&str> = text.split(',').map(str::trim).collect();
        if parts.len() != 2 {
            return LocationInput::Invalid(format!(
                "Expected 'latitude,longitude', got: {text}"
            ));
        }

        match (parts[0].parse::<f64>(), parts[1].parse::<f64>()) {
            (Ok(lat), Ok(lon)) => Self::from_pair(lat, lon),
            _ => LocationInput::Invalid(format!("Invalid coordinate values: {text}")),
        }
    }

    fn from_pair(lat: f64, lon: f64) -> LocationInput {
        match Coordinates::new(lat, lon) {
            Ok(coordinates) => LocationInput::Coordinates(coordinates),
            Err(HazardPlanError::Resolution { message }) => LocationInput::Invalid(message),
            Err(e) => LocationInput::Invalid(e.to_string()),
        }
    }

    /// Only digits, signs, dots, commas and whitespace
    fn looks_numeric(text: &str) -> bool {
        text.chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | ',') || c.is_whitespace())
    }
}

/// Service for resolving location queries
pub struct LocationResolver;

impl LocationResolver {
    pub async fn resolve(geocoder: &dyn Geocoder, query: &LocationQuery) -> Result<Coordinates> {
        let input = LocationParser::parse(query);
        debug!("Parsed location input: {:?}", input);

        match input {
            LocationInput::Coordinates(coordinates) => Ok(coordinates),
            LocationInput::PlaceName(name) => Self::resolve_name(geocoder, &name).await,
            LocationInput::Invalid(reason) => Err(HazardPlanError::resolution(reason)),
        }
    }

    async fn resolve_name(geocoder: &dyn Geocoder, name: &str) -> Result<Coordinates> {
        debug!("Geocoding location name: {}", name);

        let Some(best) = geocoder.geocode(name).await?.into_iter().next() else {
            warn!("No geocoding results for '{}'", name);
            return Err(HazardPlanError::resolution(format!("Location not found: {name}")));
        };

        debug!(
            "Found location: {} ({:.4}, {:.4})",
            best.name, best.latitude, best.longitude
        );
        Coordinates::new(best.latitude, best.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::GeocodeCandidate;
    use async_trait::async_trait;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubGeocoder {
        candidates: Vec<GeocodeCandidate>,
        calls: AtomicUsize,
    }

    impl StubGeocoder {
        fn new(candidates: Vec<(f64, f64)>) -> Self {
            Self {
                candidates: candidates
                    .into_iter()
                    .map(|(latitude, longitude)| GeocodeCandidate {
                        name: "Stub".to_string(),
                        latitude,
                        longitude,
                        country: None,
                    })
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn geocode(&self, _name: &str) -> Result<Vec<GeocodeCandidate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.candidates.clone())
        }
    }

    #[rstest]
    #[case("13.34,74.74", 13.34, 74.74)]
    #[case(" 13.34 , 74.74 ", 13.34, 74.74)]
    #[case("-33.87,151.21", -33.87, 151.21)]
    #[case("+90,-180", 90.0, -180.0)]
    fn test_parse_numeric_text(#[case] text: &str, #[case] lat: f64, #[case] lon: f64) {
        assert_eq!(
            LocationParser::parse(&text.into()),
            LocationInput::Coordinates(Coordinates::new(lat, lon).unwrap())
        );
    }

    #[rstest]
    #[case("Udupi")]
    #[case("Udupi, India")]
    #[case("10115 Berlin")]
    fn test_parse_place_names(#[case] text: &str) {
        assert_eq!(
            LocationParser::parse(&text.into()),
            LocationInput::PlaceName(text.to_string())
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("13.34")]
    #[case("1,2,3")]
    #[case("1.2.3,4")]
    #[case("91,0")]
    #[case("0,181")]
    fn test_parse_invalid_text(#[case] text: &str) {
        assert!(matches!(
            LocationParser::parse(&text.into()),
            LocationInput::Invalid(_)
        ));
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            LocationParser::parse(&(13.34, 74.74).into()),
            LocationInput::Coordinates(Coordinates::new(13.34, 74.74).unwrap())
        );
        assert!(matches!(
            LocationParser::parse(&(120.0, 0.0).into()),
            LocationInput::Invalid(_)
        ));
    }

    #[tokio::test]
    async fn test_numeric_input_skips_geocoder() {
        let geocoder = StubGeocoder::new(vec![(1.0, 1.0)]);
        let coordinates = LocationResolver::resolve(&geocoder, &"13.34,74.74".into())
            .await
            .unwrap();

        assert_eq!(coordinates, Coordinates::new(13.34, 74.74).unwrap());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_place_name_uses_first_match() {
        let geocoder = StubGeocoder::new(vec![(13.34, 74.74), (50.0, 8.0)]);
        let coordinates = LocationResolver::resolve(&geocoder, &"Udupi".into())
            .await
            .unwrap();

        assert_eq!(coordinates, Coordinates::new(13.34, 74.74).unwrap());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_matches_is_resolution_error() {
        let geocoder = StubGeocoder::new(vec![]);
        let result = LocationResolver::resolve(&geocoder, &"Atlantis".into()).await;
        assert!(matches!(result, Err(HazardPlanError::Resolution { .. })));
    }

    #[tokio::test]
    async fn test_out_of_range_geocoder_match_is_rejected() {
        let geocoder = StubGeocoder::new(vec![(95.0, 0.0)]);
        let result = LocationResolver::resolve(&geocoder, &"Nowhere".into()).await;
        assert!(matches!(result, Err(HazardPlanError::Resolution { .. })));
    }

    #[tokio::test]
    async fn test_invalid_input_never_calls_geocoder() {
        let geocoder = StubGeocoder::new(vec![(1.0, 1.0)]);
        let result = LocationResolver::resolve(&geocoder, &"".into()).await;
        assert!(matches!(result, Err(HazardPlanError::Resolution { .. })));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }
}
