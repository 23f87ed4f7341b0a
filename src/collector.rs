//! Metrics collection.
//!
//! [`MetricsCollector`] runs a backend's query table and assembles the
//! results into a [`UsageMetrics`] snapshot.
//!
//! - All scalar queries are issued before any is awaited and complete
//!   independently.
//! - A failed query contributes `0` and is reported to the observer; it never
//!   fails its siblings or the snapshot.
//! - Grouped queries that fail return an empty mapping.
//!
//! # Example
//!
//! ```no_run
//! use usage_monitor::backend::prometheus::{PrometheusClient, PrometheusConfig};
//! use usage_monitor::collector::MetricsCollector;
//!
//! # async fn run() -> Result<(), usage_monitor::error::AppError> {
//! let client = PrometheusClient::new(PrometheusConfig::default())?;
//! let collector = MetricsCollector::new(client);
//!
//! let metrics = collector.get_metrics(None).await;
//! println!("sessions: {}", metrics.session_count);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use futures_util::future::join_all;

use crate::backend::MetricsBackend;
use crate::metrics::{GroupedMetric, GroupedQuery, MetricName, QuerySpec, TimeRange, UsageMetrics};
use crate::observer::{MonitorObserver, TracingObserver};

/// Collects usage metrics from one backend.
pub struct MetricsCollector<B> {
    backend: Arc<B>,
    observer: Arc<dyn MonitorObserver>,
}

impl<B: MetricsBackend> MetricsCollector<B> {
    /// Create a collector that logs through `tracing`.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::with_observer(Arc::new(backend), Arc::new(TracingObserver))
    }

    /// Create a collector with a custom observer.
    #[must_use]
    pub fn with_observer(backend: Arc<B>, observer: Arc<dyn MonitorObserver>) -> Self {
        Self { backend, observer }
    }

    /// The backend in use.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Collect one snapshot.
    ///
    /// Never fails: metrics whose query fails or returns no data are `0`.
    pub async fn get_metrics(&self, range: Option<TimeRange>) -> UsageMetrics {
        let pipelines = self
            .backend
            .metric_set()
            .scalars
            .iter()
            .map(|spec| self.collect_scalar(*spec, range));

        UsageMetrics::from_values(join_all(pipelines).await)
    }

    /// Token usage keyed by token type. Empty on failure.
    pub async fn get_token_usage_by_type(&self, range: Option<TimeRange>) -> GroupedMetric {
        let query = self.backend.metric_set().token_usage_by_type;
        self.collect_grouped("token usage by type", query, range)
            .await
    }

    /// Cost keyed by model. Empty on failure.
    pub async fn get_cost_by_model(&self, range: Option<TimeRange>) -> GroupedMetric {
        let query = self.backend.metric_set().cost_by_model;
        self.collect_grouped("cost by model", query, range).await
    }

    /// Check the backend's connection. Backends without a validation
    /// endpoint always pass.
    pub async fn check_connection(&self) -> bool {
        self.backend.probe().await
    }

    async fn collect_scalar(&self, spec: QuerySpec, range: Option<TimeRange>) -> (MetricName, f64) {
        let value = match self.backend.query(spec.expression, range).await {
            Ok(response) => self.backend.extract_scalar(&response),
            Err(e) => {
                self.observer.metric_query_failed(spec.metric, &e);
                0.0
            }
        };
        (spec.metric, value)
    }

    async fn collect_grouped(
        &self,
        name: &str,
        query: GroupedQuery,
        range: Option<TimeRange>,
    ) -> GroupedMetric {
        match self.backend.query(query.expression, range).await {
            Ok(response) => self.backend.extract_grouped(&response, query.tag_key),
            Err(e) => {
                self.observer.grouped_query_failed(name, &e);
                GroupedMetric::new()
            }
        }
    }
}
