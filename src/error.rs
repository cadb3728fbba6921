//! Error types and handling for `HazardPlan`

use thiserror::Error;

/// Main error type for the `HazardPlan` application
#[derive(Error, Debug)]
pub enum HazardPlanError {
    /// Location text could not be parsed or geocoded
    #[error("Resolution error: {message}")]
    Resolution { message: String },

    /// Weather fetch failed (network, status or payload)
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// A static table or configuration value is missing or invalid
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Serialization of an exported report failed
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl HazardPlanError {
    /// Create a new resolution error
    pub fn resolution<S: Into<String>>(message: S) -> Self {
        Self::Resolution {
            message: message.into(),
        }
    }

    /// Create a new provider error
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            HazardPlanError::Resolution { message } => {
                format!("Could not find that location: {message}. Try a city name or 'lat,lon'.")
            }
            HazardPlanError::Provider { .. } => {
                "Unable to retrieve the weather forecast. Please try again later.".to_string()
            }
            HazardPlanError::Configuration { .. } => {
                "Configuration error. Please check your config file and risk tables.".to_string()
            }
            HazardPlanError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            HazardPlanError::Serialization { .. } => {
                "The report could not be encoded or decoded.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for HazardPlanError {
    fn from(err: reqwest::Error) -> Self {
        HazardPlanError::provider(err.to_string())
    }
}

impl From<reqwest_middleware::Error> for HazardPlanError {
    fn from(err: reqwest_middleware::Error) -> Self {
        HazardPlanError::provider(err.to_string())
    }
}
