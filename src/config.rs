//! Configuration management for `HazardPlan`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::workflow::UnknownHazardPolicy;
use crate::{HazardPlanError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `HazardPlan` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardPlanConfig {
    /// Weather and geocoding API configuration
    pub weather: WeatherConfig,
    /// Outbound HTTP client settings
    pub http: HttpConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Default request values
    pub defaults: DefaultsConfig,
    /// Risk table overrides
    pub tables: TablesConfig,
    /// Insurance catalog settings
    pub insurance: InsuranceConfig,
    /// HTTP server settings
    pub server: ServerConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Daily forecast endpoint
    pub forecast_url: String,
    /// Place name search endpoint
    pub geocoding_url: String,
    /// Number of forecast days, today included
    pub horizon_days: u32,
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// Transient-failure retries added as middleware on the outbound client.
    ///
    /// Opt-in outer layer only: the weather adapter and the pipeline never
    /// retry on their own. Defaults to 0, which installs no retry middleware.
    pub max_retries: u32,
    /// User agent sent with every request
    pub user_agent: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty, compact or json)
    pub format: String,
}

/// Values used when a request leaves them out
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Policy name assumed when the user does not mention one
    pub policy: String,
    /// Insurance category used when nothing was detected
    pub insurance_category: String,
}

/// Risk table settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TablesConfig {
    /// Directory with JSON files replacing the embedded tables
    pub directory: Option<PathBuf>,
    /// What the synthesizer does with hazards that have no template
    pub unknown_hazard: UnknownHazardPolicy,
}

/// Insurance catalog settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsuranceConfig {
    /// JSON catalog replacing the embedded one
    pub catalog_path: Option<PathBuf>,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            geocoding_url: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            horizon_days: 3,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            max_retries: 0,
            user_agent: format!("HazardPlan/{}", crate::VERSION),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            policy: "Standard Home Insurance".to_string(),
            insurance_category: "flood".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl HazardPlanConfig {
    /// Load configuration from the default file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // HAZARDPLAN_WEATHER__HORIZON_DAYS=5
        builder = builder.add_source(
            Environment::with_prefix("HAZARDPLAN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build().map_err(|e| {
            HazardPlanError::configuration(format!("Failed to build configuration: {e}"))
        })?;

        let mut config: HazardPlanConfig = settings.try_deserialize().map_err(|e| {
            HazardPlanError::configuration(format!("Failed to deserialize configuration: {e}"))
        })?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hazardplan").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        let weather = WeatherConfig::default();
        if self.weather.forecast_url.is_empty() {
            self.weather.forecast_url = weather.forecast_url;
        }
        if self.weather.geocoding_url.is_empty() {
            self.weather.geocoding_url = weather.geocoding_url;
        }
        if self.weather.horizon_days == 0 {
            self.weather.horizon_days = weather.horizon_days;
        }
        if self.http.timeout_seconds == 0 {
            self.http.timeout_seconds = HttpConfig::default().timeout_seconds;
        }
        if self.http.user_agent.is_empty() {
            self.http.user_agent = HttpConfig::default().user_agent;
        }
        if self.logging.level.is_empty() {
            self.logging.level = LoggingConfig::default().level;
        }
        if self.logging.format.is_empty() {
            self.logging.format = LoggingConfig::default().format;
        }
        if self.defaults.policy.trim().is_empty() {
            self.defaults.policy = DefaultsConfig::default().policy;
        }
        if self.defaults.insurance_category.trim().is_empty() {
            self.defaults.insurance_category = DefaultsConfig::default().insurance_category;
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        // Open-Meteo serves at most 16 forecast days
        if !(1..=16).contains(&self.weather.horizon_days) {
            return Err(HazardPlanError::configuration(
                "Forecast horizon must be between 1 and 16 days",
            ));
        }

        if self.http.timeout_seconds > 300 {
            return Err(HazardPlanError::configuration(
                "HTTP timeout cannot exceed 300 seconds",
            ));
        }

        if self.http.max_retries > 10 {
            return Err(HazardPlanError::configuration(
                "HTTP max retries cannot exceed 10",
            ));
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(HazardPlanError::configuration(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "compact", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(HazardPlanError::configuration(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        for (name, url) in [
            ("forecast", &self.weather.forecast_url),
            ("geocoding", &self.weather.geocoding_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(HazardPlanError::configuration(format!(
                    "Weather {name} URL must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        Ok(())
    }
}
