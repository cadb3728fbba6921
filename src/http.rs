//! Shared outbound HTTP client
//!
//! Timeout and user agent come from `[http]`; a bounded transient-retry
//! middleware is only installed when `max_retries` is non-zero.

use crate::config::HttpConfig;
use crate::{HazardPlanError, Result};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;
use tracing::debug;

pub fn build_client(config: &HttpConfig) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| HazardPlanError::configuration(format!("Failed to create HTTP client: {e}")))?;

    let mut builder = ClientBuilder::new(client);
    if config.max_retries > 0 {
        debug!("Retrying transient HTTP failures up to {} times", config.max_retries);
        let policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(policy));
    }

    Ok(builder.build())
}
