//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading (with an optional `.env` file)
//! - Backend selection and credentials
//! - Configuration validation
//! - Credential redaction via [`SecretString`]
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use usage_monitor::backend::datadog::DatadogConfig;
//! use usage_monitor::config::{BackendConfig, Config};
//!
//! // Build directly (use Config::from_env() in production)
//! let config = Config {
//!     backend: BackendConfig::Datadog(DatadogConfig::new("dd-api-key", "dd-app-key")),
//!     poll_interval: Duration::from_secs(30),
//!     lookback: Duration::from_secs(3600),
//!     request_timeout_ms: 30_000,
//!     log_level: "info".to_string(),
//! };
//!
//! // Keys are protected from accidental logging
//! let debug = format!("{config:?}");
//! assert!(debug.contains("<REDACTED>"));
//! assert!(!debug.contains("dd-api-key"));
//! ```

mod secret;
mod validation;

pub use secret::SecretString;
pub use validation::{
    validate_config, MAX_LOOKBACK_SECS, MAX_TIMEOUT_MS, MIN_LOOKBACK_SECS, MIN_TIMEOUT_MS,
};

use std::time::Duration;

use tracing_subscriber::filter::EnvFilter;

use crate::backend::datadog::{DatadogConfig, DEFAULT_DATADOG_SITE};
use crate::backend::prometheus::{PrometheusConfig, DEFAULT_PROMETHEUS_URL};
use crate::backend::BackendKind;
use crate::error::ConfigError;
use crate::metrics::DEFAULT_LOOKBACK;
use crate::poller::DEFAULT_POLL_INTERVAL;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Per-backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// Prometheus-style query API.
    Prometheus(PrometheusConfig),
    /// Datadog metrics query API.
    Datadog(DatadogConfig),
}

impl BackendConfig {
    /// Which backend this configures.
    #[must_use]
    pub const fn kind(&self) -> BackendKind {
        match self {
            Self::Prometheus(_) => BackendKind::Prometheus,
            Self::Datadog(_) => BackendKind::Datadog,
        }
    }
}

/// Application configuration.
///
/// Use [`Config::from_env`] to load it. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend connection settings, credentials included.
    pub backend: BackendConfig,
    /// Delay between polling cycles.
    pub poll_interval: Duration,
    /// Default query window.
    pub lookback: Duration,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: String,
}

impl Config {
    /// Load configuration for `backend` from environment variables.
    ///
    /// Prometheus:
    /// - `PROMETHEUS_URL` (default: `http://localhost:9090`)
    /// - `PROMETHEUS_BEARER_TOKEN` (optional)
    ///
    /// Datadog:
    /// - `DD_API_KEY`, `DD_APPLICATION_KEY` (required)
    /// - `DD_SITE` (default: `datadoghq.com`)
    /// - `DD_BASE_URL` (optional, overrides `DD_SITE`)
    ///
    /// Shared:
    /// - `POLL_INTERVAL_MS` (default: `30000`)
    /// - `LOOKBACK_SECS` (default: `3600`)
    /// - `REQUEST_TIMEOUT_MS` (default: `30000`)
    /// - `LOG_LEVEL` (default: `info`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - a required Datadog key is missing
    /// - a numeric variable is not a non-negative integer
    /// - any value fails validation (see [`validate_config`])
    #[must_use = "configuration should be used"]
    pub fn from_env(backend: BackendKind) -> Result<Self, ConfigError> {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();

        let request_timeout_ms = parse_env_u64("REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)?;
        let poll_interval = Duration::from_millis(parse_env_u64(
            "POLL_INTERVAL_MS",
            millis(DEFAULT_POLL_INTERVAL),
        )?);
        let lookback =
            Duration::from_secs(parse_env_u64("LOOKBACK_SECS", DEFAULT_LOOKBACK.as_secs())?);
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into());

        let backend = match backend {
            BackendKind::Prometheus => {
                BackendConfig::Prometheus(prometheus_from_env(request_timeout_ms))
            }
            BackendKind::Datadog => {
                BackendConfig::Datadog(datadog_from_env(request_timeout_ms, lookback)?)
            }
        };

        let config = Self {
            backend,
            poll_interval,
            lookback,
            request_timeout_ms,
            log_level,
        };

        validate_config(&config)?;
        Ok(config)
    }

    /// Which backend is configured.
    #[must_use]
    pub const fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Log filter built from `log_level`.
    ///
    /// A directive that does not parse falls back to [`DEFAULT_LOG_LEVEL`].
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    }
}

fn prometheus_from_env(timeout_ms: u64) -> PrometheusConfig {
    let base_url =
        std::env::var("PROMETHEUS_URL").unwrap_or_else(|_| DEFAULT_PROMETHEUS_URL.into());
    let config = PrometheusConfig::new()
        .with_base_url(base_url.trim_end_matches('/'))
        .with_timeout_ms(timeout_ms);

    match std::env::var("PROMETHEUS_BEARER_TOKEN") {
        Ok(token) if !token.trim().is_empty() => config.with_bearer_token(token),
        _ => config,
    }
}

fn datadog_from_env(timeout_ms: u64, lookback: Duration) -> Result<DatadogConfig, ConfigError> {
    let api_key = required_env("DD_API_KEY")?;
    let application_key = required_env("DD_APPLICATION_KEY")?;
    let site = std::env::var("DD_SITE").unwrap_or_else(|_| DEFAULT_DATADOG_SITE.into());

    let mut config = DatadogConfig::for_site(&site, api_key, application_key)
        .with_lookback(lookback)
        .with_timeout_ms(timeout_ms);
    if let Ok(base_url) = std::env::var("DD_BASE_URL") {
        config = config.with_base_url(base_url.trim_end_matches('/'));
    }
    Ok(config)
}

fn required_env(name: &str) -> Result<SecretString, ConfigError> {
    std::env::var(name)
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingRequired { var: name.into() })
}

/// Parse an environment variable as u64, using a default if not set.
fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a non-negative integer".into(),
        })
    })
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
