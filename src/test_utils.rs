//! Test utilities and fakes.
//!
//! This module provides shared testing infrastructure:
//! - [`FakeBackend`]: a scripted [`MetricsBackend`] using the real reducers
//! - Response builders for both backends
//!
//! Only compiled for tests (`#[cfg(test)]`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::backend::datadog::{self, DatadogResponse, DATADOG_METRICS};
use crate::backend::prometheus::{self, PrometheusResponse, PROMETHEUS_METRICS};
use crate::backend::{BackendKind, MetricsBackend};
use crate::error::{QueryError, QueryFailure};
use crate::metrics::{GroupedMetric, MetricSet, TimeRange};

/// A backend that answers from a script instead of the network.
///
/// Unscripted expressions get an empty response.
pub struct FakeBackend<R> {
    kind: BackendKind,
    metric_set: &'static MetricSet,
    scalar: fn(&R) -> f64,
    grouped: fn(&R, &str) -> GroupedMetric,
    responses: HashMap<String, R>,
    failing: HashSet<String>,
    fail_all: bool,
    probe: bool,
    delay: Option<Duration>,
    queries: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeBackend<PrometheusResponse> {
    /// Fake Prometheus backend.
    pub fn prometheus() -> Self {
        Self::new(
            BackendKind::Prometheus,
            &PROMETHEUS_METRICS,
            prometheus::extract_scalar,
            prometheus::extract_grouped,
        )
    }
}

impl FakeBackend<DatadogResponse> {
    /// Fake Datadog backend.
    pub fn datadog() -> Self {
        Self::new(
            BackendKind::Datadog,
            &DATADOG_METRICS,
            datadog::extract_scalar,
            datadog::extract_grouped,
        )
    }
}

impl<R> FakeBackend<R> {
    fn new(
        kind: BackendKind,
        metric_set: &'static MetricSet,
        scalar: fn(&R) -> f64,
        grouped: fn(&R, &str) -> GroupedMetric,
    ) -> Self {
        Self {
            kind,
            metric_set,
            scalar,
            grouped,
            responses: HashMap::new(),
            failing: HashSet::new(),
            fail_all: false,
            probe: true,
            delay: None,
            queries: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Answer `expression` with `response`.
    pub fn respond(mut self, expression: &str, response: R) -> Self {
        self.responses.insert(expression.to_string(), response);
        self
    }

    /// Fail `expression` with a transport error.
    pub fn fail(mut self, expression: &str) -> Self {
        self.failing.insert(expression.to_string());
        self
    }

    /// Fail every query.
    pub const fn fail_all(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Set the probe result.
    pub const fn with_probe(mut self, probe: bool) -> Self {
        self.probe = probe;
        self
    }

    /// Delay every query.
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Drain the expressions queried so far, sorted.
    pub fn take_queries(&self) -> Vec<String> {
        let mut queries = std::mem::take(&mut *self.queries.lock().unwrap());
        queries.sort_unstable();
        queries
    }

    /// Highest number of concurrently running queries seen.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R> MetricsBackend for FakeBackend<R>
where
    R: Clone + Default + Send + Sync + 'static,
{
    type Response = R;

    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn metric_set(&self) -> &'static MetricSet {
        self.metric_set
    }

    async fn query(&self, expression: &str, _range: Option<TimeRange>) -> Result<R, QueryError> {
        self.queries.lock().unwrap().push(expression.to_string());
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_all || self.failing.contains(expression) {
            return Err(QueryError::new(
                self.kind,
                expression,
                QueryFailure::Transport {
                    message: "connection refused".into(),
                },
            ));
        }
        Ok(self.responses.get(expression).cloned().unwrap_or_default())
    }

    fn extract_scalar(&self, response: &R) -> f64 {
        (self.scalar)(response)
    }

    fn extract_grouped(&self, response: &R, tag_key: &str) -> GroupedMetric {
        (self.grouped)(response, tag_key)
    }

    async fn probe(&self) -> bool {
        self.probe
    }
}

/// Single unlabeled instant-vector row.
pub fn prometheus_vector(value: &str) -> PrometheusResponse {
    prometheus_from_rows(&json!([{"metric": {}, "value": [1_700_000_000, value]}]))
}

/// One row per `(label value, sample)` pair, labeled with `label`.
pub fn prometheus_grouped(label: &str, rows: &[(&str, &str)]) -> PrometheusResponse {
    let rows: Vec<Value> = rows
        .iter()
        .map(|(tag, value)| json!({"metric": {label: tag}, "value": [1_700_000_000, value]}))
        .collect();
    prometheus_from_rows(&Value::Array(rows))
}

fn prometheus_from_rows(rows: &Value) -> PrometheusResponse {
    serde_json::from_value(json!({
        "status": "success",
        "data": {"resultType": "vector", "result": rows}
    }))
    .unwrap()
}

/// Datadog response with the given `series` array.
pub fn datadog_response(series: Value) -> DatadogResponse {
    serde_json::from_value(json!({"status": "ok", "series": series})).unwrap()
}
