//! Prometheus query client.

#![allow(clippy::missing_errors_doc)]

use async_trait::async_trait;
use reqwest::Client;

use super::types::PrometheusResponse;
use super::{reducer, PROMETHEUS_METRICS};
use crate::backend::http::{build_client, get_json};
use crate::backend::{BackendKind, MetricsBackend};
use crate::config::SecretString;
use crate::error::{AppError, QueryError, QueryFailure};
use crate::metrics::{GroupedMetric, MetricSet, TimeRange};

/// Default Prometheus base URL.
pub const DEFAULT_PROMETHEUS_URL: &str = "http://localhost:9090";
/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Prometheus client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrometheusConfig {
    /// Base URL, without the `/api/v1` suffix.
    pub base_url: String,
    /// Optional static bearer token.
    pub bearer_token: Option<SecretString>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl PrometheusConfig {
    /// Create a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set bearer token.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<SecretString>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Set timeout in milliseconds.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PROMETHEUS_URL.to_string(),
            bearer_token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Prometheus HTTP API client.
#[derive(Debug)]
pub struct PrometheusClient {
    client: Client,
    config: PrometheusConfig,
}

impl PrometheusClient {
    /// Create a new client.
    pub fn new(config: PrometheusConfig) -> Result<Self, AppError> {
        let client = build_client(config.timeout_ms)?;
        Ok(Self { client, config })
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the client configuration.
    #[must_use]
    pub const fn config(&self) -> &PrometheusConfig {
        &self.config
    }
}

#[async_trait]
impl MetricsBackend for PrometheusClient {
    type Response = PrometheusResponse;

    fn kind(&self) -> BackendKind {
        BackendKind::Prometheus
    }

    fn metric_set(&self) -> &'static MetricSet {
        &PROMETHEUS_METRICS
    }

    /// Instant queries are evaluated at the server's current time, so the
    /// range is not sent.
    async fn query(
        &self,
        expression: &str,
        _range: Option<TimeRange>,
    ) -> Result<PrometheusResponse, QueryError> {
        let url = format!("{}/api/v1/query", self.config.base_url);
        let mut request = self.client.get(&url).query(&[("query", expression)]);
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token.expose());
        }

        let response: PrometheusResponse =
            get_json(request, BackendKind::Prometheus, expression, self.config.timeout_ms).await?;

        if response.is_error() {
            return Err(QueryError::new(
                BackendKind::Prometheus,
                expression,
                QueryFailure::Backend {
                    message: response.error.unwrap_or_default(),
                },
            ));
        }
        Ok(response)
    }

    fn extract_scalar(&self, response: &PrometheusResponse) -> f64 {
        reducer::extract_scalar(response)
    }

    fn extract_grouped(&self, response: &PrometheusResponse, tag_key: &str) -> GroupedMetric {
        reducer::extract_grouped(response, tag_key)
    }
}
