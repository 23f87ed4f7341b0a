//! Datadog query client.

#![allow(clippy::missing_errors_doc)]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};

use super::types::{DatadogResponse, ValidateResponse};
use super::{reducer, DATADOG_METRICS};
use crate::backend::http::{build_client, get_json};
use crate::backend::{BackendKind, MetricsBackend};
use crate::config::SecretString;
use crate::error::{AppError, QueryError, QueryFailure};
use crate::metrics::{GroupedMetric, MetricSet, TimeRange, DEFAULT_LOOKBACK};

/// Default Datadog site.
pub const DEFAULT_DATADOG_SITE: &str = "datadoghq.com";
/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

const API_KEY_HEADER: &str = "DD-API-KEY";
const APPLICATION_KEY_HEADER: &str = "DD-APPLICATION-KEY";

/// Datadog client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatadogConfig {
    /// Base URL, e.g. `https://api.datadoghq.com`.
    pub base_url: String,
    /// API key (`DD-API-KEY`).
    pub api_key: SecretString,
    /// Application key (`DD-APPLICATION-KEY`).
    pub application_key: SecretString,
    /// Window used when a query has no explicit range.
    pub lookback: Duration,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl DatadogConfig {
    /// Configuration for the default site.
    #[must_use]
    pub fn new(api_key: impl Into<SecretString>, application_key: impl Into<SecretString>) -> Self {
        Self::for_site(DEFAULT_DATADOG_SITE, api_key, application_key)
    }

    /// Configuration for a specific site such as `datadoghq.eu`.
    #[must_use]
    pub fn for_site(
        site: &str,
        api_key: impl Into<SecretString>,
        application_key: impl Into<SecretString>,
    ) -> Self {
        Self {
            base_url: format!("https://api.{site}"),
            api_key: api_key.into(),
            application_key: application_key.into(),
            lookback: DEFAULT_LOOKBACK,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Set base URL, overriding the site.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set default lookback window.
    #[must_use]
    pub const fn with_lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }

    /// Set timeout in milliseconds.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Datadog HTTP API client.
#[derive(Debug)]
pub struct DatadogClient {
    client: Client,
    config: DatadogConfig,
}

impl DatadogClient {
    /// Create a new client.
    pub fn new(config: DatadogConfig) -> Result<Self, AppError> {
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
    pub const fn config(&self) -> &DatadogConfig {
        &self.config
    }

    fn authenticated(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .header(API_KEY_HEADER, self.config.api_key.expose())
            .header(APPLICATION_KEY_HEADER, self.config.application_key.expose())
    }

    /// Call the validate endpoint.
    ///
    /// Returns `true` only when the body says `"valid": true`.
    pub async fn validate(&self) -> bool {
        let url = format!("{}/api/v1/validate", self.config.base_url);
        match get_json::<ValidateResponse>(
            self.authenticated(&url),
            BackendKind::Datadog,
            "validate",
            self.config.timeout_ms,
        )
        .await
        {
            Ok(body) => body.valid,
            Err(e) => {
                tracing::warn!(error = %e, "Datadog connection check failed");
                false
            }
        }
    }
}

#[async_trait]
impl MetricsBackend for DatadogClient {
    type Response = DatadogResponse;

    fn kind(&self) -> BackendKind {
        BackendKind::Datadog
    }

    fn metric_set(&self) -> &'static MetricSet {
        &DATADOG_METRICS
    }

    async fn query(
        &self,
        expression: &str,
        range: Option<TimeRange>,
    ) -> Result<DatadogResponse, QueryError> {
        let range = range.unwrap_or_else(|| TimeRange::last(self.config.lookback));
        let url = format!("{}/api/v1/query", self.config.base_url);
        let request = self
            .authenticated(&url)
            .header("Content-Type", "application/json")
            .query(&[
                ("from", range.from_unix().to_string()),
                ("to", range.to_unix().to_string()),
                ("query", expression.to_string()),
            ]);

        let response: DatadogResponse =
            get_json(request, BackendKind::Datadog, expression, self.config.timeout_ms).await?;

        if response.is_error() {
            return Err(QueryError::new(
                BackendKind::Datadog,
                expression,
                QueryFailure::Backend {
                    message: response.error.unwrap_or_default(),
                },
            ));
        }
        Ok(response)
    }

    fn extract_scalar(&self, response: &DatadogResponse) -> f64 {
        reducer::extract_scalar(response)
    }

    fn extract_grouped(&self, response: &DatadogResponse, tag_key: &str) -> GroupedMetric {
        reducer::extract_grouped(response, tag_key)
    }

    async fn probe(&self) -> bool {
        self.validate().await
    }
}
