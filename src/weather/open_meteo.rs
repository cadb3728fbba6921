//! Open-Meteo forecast and geocoding client (no API key required)

use super::{GeocodeCandidate, Geocoder, WeatherProvider};
use crate::config::{HazardPlanConfig, WeatherConfig};
use crate::http::build_client;
use crate::models::{Coordinates, ForecastSeries};
use crate::{HazardPlanError, Result};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

const DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_sum,windspeed_10m_max";

pub struct OpenMeteoClient {
    client: ClientWithMiddleware,
    forecast_url: String,
    geocoding_url: String,
}

impl OpenMeteoClient {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &WeatherConfig) -> Self {
        Self {
            client,
            forecast_url: config.forecast_url.trim_end_matches('/').to_string(),
            geocoding_url: config.geocoding_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &HazardPlanConfig) -> Result<Self> {
        let client = build_client(&config.http)?;
        Ok(Self::new(client, &config.weather))
    }

    /// Forecast URL for the inclusive range `[start, start + days - 1]`
    pub fn forecast_request_url(
        &self,
        coordinates: Coordinates,
        start: NaiveDate,
        days: u32,
    ) -> Result<String> {
        let end = start
            .checked_add_days(Days::new(u64::from(days.max(1) - 1)))
            .ok_or_else(|| {
                HazardPlanError::provider(format!(
                    "Forecast range overflows: {start} + {days} days"
                ))
            })?;

        Ok(format!(
            "{}?latitude={}&longitude={}&daily={DAILY_FIELDS}&timezone=auto\
             &start_date={start}&end_date={end}",
            self.forecast_url, coordinates.latitude, coordinates.longitude
        ))
    }

    #[must_use]
    pub fn geocoding_request_url(&self, name: &str) -> String {
        format!(
            "{}?name={}&count=5&language=en&format=json",
            self.geocoding_url,
            urlencoding::encode(name)
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("Open-Meteo request URL: {}", url);
        let start_time = Instant::now();

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HazardPlanError::provider(format!(
                "Open-Meteo returned HTTP {status}"
            )));
        }

        let payload = response.json::<T>().await.map_err(|e| {
            HazardPlanError::provider(format!("Malformed Open-Meteo payload: {e}"))
        })?;

        let elapsed = start_time.elapsed();
        if elapsed.as_secs() > 5 {
            warn!("Slow Open-Meteo response: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(payload)
    }
}

#[async_trait]
impl Geocoder for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn geocode(&self, name: &str) -> Result<Vec<GeocodeCandidate>> {
        let url = self.geocoding_request_url(name);
        let response: GeocodingResponse = self.get_json(&url).await?;
        let candidates = response.into_candidates();
        info!("Geocoding '{}' returned {} candidates", name, candidates.len());
        Ok(candidates)
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    async fn daily_forecast(
        &self,
        coordinates: Coordinates,
        start: NaiveDate,
        days: u32,
    ) -> Result<ForecastSeries> {
        let url = self.forecast_request_url(coordinates, start, days)?;
        let response: ForecastResponse = self.get_json(&url).await?;
        let series = response.into_series();
        info!("Retrieved {}-day forecast", series.horizon());
        Ok(series)
    }
}

/// Geocoding response from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    pub results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    pub admin1: Option<String>,
}

impl GeocodingResponse {
    #[must_use]
    pub fn into_candidates(self) -> Vec<GeocodeCandidate> {
        self.results
            .unwrap_or_default()
            .into_iter()
            .map(GeocodeCandidate::from)
            .collect()
    }
}

impl From<GeocodingResult> for GeocodeCandidate {
    fn from(result: GeocodingResult) -> Self {
        let name = match result.admin1 {
            Some(region) if region != result.name => format!("{}, {region}", result.name),
            _ => result.name,
        };
        Self {
            name,
            latitude: result.latitude,
            longitude: result.longitude,
            country: result.country,
        }
    }
}

/// Daily forecast response from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub daily: Option<DailyData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DailyData {
    #[serde(default)]
    pub time: Vec<NaiveDate>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Option<Vec<Option<f64>>>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Option<Vec<Option<f64>>>,
    #[serde(rename = "windspeed_10m_max")]
    pub wind_speed_max: Option<Vec<Option<f64>>>,
    #[serde(rename = "precipitation_sum")]
    pub precipitation: Option<Vec<Option<f64>>>,
}

impl ForecastResponse {
    /// Missing `daily` block or arrays degrade to empty series
    #[must_use]
    pub fn into_series(self) -> ForecastSeries {
        let daily = self.daily.unwrap_or_default();
        ForecastSeries {
            dates: daily.time,
            precipitation_sum_mm: daily.precipitation.unwrap_or_default(),
            temperature_max_c: daily.temperature_max.unwrap_or_default(),
            temperature_min_c: daily.temperature_min.unwrap_or_default(),
            wind_speed_max_kmh: daily.wind_speed_max.unwrap_or_default(),
        }
    }
}
