//! Configuration validation.
//!
//! Range and presence checks applied after loading.

use super::{BackendConfig, Config};
use crate::cli::MIN_POLL_INTERVAL_MS;
use crate::error::ConfigError;

/// Minimum allowed timeout in milliseconds (1 second).
pub const MIN_TIMEOUT_MS: u64 = 1000;

/// Maximum allowed timeout in milliseconds (5 minutes).
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Minimum query window in seconds (1 minute).
pub const MIN_LOOKBACK_SECS: u64 = 60;

/// Maximum query window in seconds (7 days).
pub const MAX_LOOKBACK_SECS: u64 = 7 * 24 * 3600;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if:
/// - a base URL is empty or not `http(s)://`
/// - `DD_API_KEY` or `DD_APPLICATION_KEY` is blank
/// - `REQUEST_TIMEOUT_MS` is outside 1000..=300000
/// - `POLL_INTERVAL_MS` is below 1000
/// - `LOOKBACK_SECS` is outside 60..=604800
#[must_use = "validation result should be checked"]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    match &config.backend {
        BackendConfig::Prometheus(prometheus) => {
            check_url("PROMETHEUS_URL", &prometheus.base_url)?;
        }
        BackendConfig::Datadog(datadog) => {
            check_url("DD_BASE_URL", &datadog.base_url)?;
            if datadog.api_key.is_blank() {
                return Err(invalid("DD_API_KEY", "must not be empty"));
            }
            if datadog.application_key.is_blank() {
                return Err(invalid("DD_APPLICATION_KEY", "must not be empty"));
            }
        }
    }

    if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&config.request_timeout_ms) {
        return Err(invalid(
            "REQUEST_TIMEOUT_MS",
            format!("must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS} ms"),
        ));
    }

    if config.poll_interval.as_millis() < u128::from(MIN_POLL_INTERVAL_MS) {
        return Err(invalid(
            "POLL_INTERVAL_MS",
            format!("must be at least {MIN_POLL_INTERVAL_MS} ms"),
        ));
    }

    if !(MIN_LOOKBACK_SECS..=MAX_LOOKBACK_SECS).contains(&config.lookback.as_secs()) {
        return Err(invalid(
            "LOOKBACK_SECS",
            format!("must be between {MIN_LOOKBACK_SECS} and {MAX_LOOKBACK_SECS} seconds"),
        ));
    }

    Ok(())
}

fn check_url(var: &str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(invalid(var, "must be an http(s) URL"))
    }
}

fn invalid(var: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        var: var.into(),
        reason: reason.into(),
    }
}
