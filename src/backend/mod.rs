//! Metrics backends.
//!
//! This module provides:
//! - [`MetricsBackend`]: the capability every backend implements
//! - [`prometheus`]: Prometheus-style instant-vector query API
//! - [`datadog`]: Datadog v1 metrics query API
//!
//! # Architecture
//!
//! ```text
//! MetricsCollector ──query(expr)──▶ MetricsBackend ──GET──▶ /api/v1/query
//!        │                               │
//!        │◀──extract_scalar/grouped──────┘
//!        ▼
//!   UsageMetrics
//! ```
//!
//! Each backend pairs a query client with pure reducers over its own
//! response type, so the collector never inspects response shapes.

pub mod datadog;
pub mod prometheus;

mod http;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::metrics::{GroupedMetric, MetricSet, TimeRange};

/// Which backend a monitor talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Prometheus-style HTTP query API.
    #[default]
    Prometheus,
    /// Datadog metrics query API.
    Datadog,
}

impl BackendKind {
    /// Decimal places used when rendering costs.
    #[must_use]
    pub const fn cost_precision(self) -> usize {
        match self {
            Self::Prometheus => 2,
            Self::Datadog => 4,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prometheus => f.write_str("Prometheus"),
            Self::Datadog => f.write_str("Datadog"),
        }
    }
}

/// A metrics backend: one query client plus the reducers for its responses.
///
/// Implementations are selected at construction time. `query` performs one
/// outbound request and never retries.
#[async_trait]
pub trait MetricsBackend: Send + Sync {
    /// Decoded response for one query.
    type Response: Send;

    /// Backend identity.
    fn kind(&self) -> BackendKind;

    /// The static query table for this backend.
    fn metric_set(&self) -> &'static MetricSet;

    /// Run one query.
    ///
    /// `range` is the query window; `None` means the backend's default.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] on transport failure, non-success status, or an
    /// undecodable body.
    async fn query(
        &self,
        expression: &str,
        range: Option<TimeRange>,
    ) -> Result<Self::Response, QueryError>;

    /// Reduce a response to its latest scalar, `0` when there is no data.
    fn extract_scalar(&self, response: &Self::Response) -> f64;

    /// Reduce a response to one latest scalar per `tag_key` value.
    fn extract_grouped(&self, response: &Self::Response, tag_key: &str) -> GroupedMetric;

    /// Check reachability and credentials.
    ///
    /// Never fails: any problem is reported as `false`. Backends without a
    /// validation endpoint keep this default and always pass.
    async fn probe(&self) -> bool {
        true
    }
}
