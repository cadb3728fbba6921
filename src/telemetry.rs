//! Logging setup
//!
//! `RUST_LOG` wins over the configured level. Output goes to stderr so JSON
//! reports on stdout stay clean.

use crate::config::LoggingConfig;
use crate::{HazardPlanError, Result};
use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is not set
#[must_use]
pub fn filter_directive(config: &LoggingConfig, verbose: bool) -> &str {
    if verbose { "debug" } else { config.level.as_str() }
}

pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let directive = filter_directive(config, verbose);
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directive).map_err(|e| {
            HazardPlanError::configuration(format!("Invalid log level/filter '{directive}': {e}"))
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let result = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "compact" => builder.compact().try_init(),
        _ => builder.pretty().try_init(),
    };

    result.map_err(|e| HazardPlanError::configuration(format!("Failed to initialize logging: {e}")))
}
