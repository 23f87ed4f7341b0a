//! Shared fixtures for workflow tests.

#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use serde_json::{json, Value};
use usage_monitor::error::{AppError, QueryError};
use usage_monitor::metrics::MetricName;
use usage_monitor::observer::MonitorObserver;
use usage_monitor::report::{ReportRenderer, UsageReport};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Observer that records events as short strings.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.starts_with(prefix))
            .count()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl MonitorObserver for RecordingObserver {
    fn metric_query_failed(&self, metric: MetricName, _error: &QueryError) {
        self.push(format!("metric_failed:{metric}"));
    }

    fn grouped_query_failed(&self, query: &str, _error: &QueryError) {
        self.push(format!("grouped_failed:{query}"));
    }

    fn cycle_failed(&self, error: &AppError) {
        self.push(format!("cycle_failed:{error}"));
    }

    fn polling_started(&self, interval: Duration) {
        self.push(format!("started:{}", interval.as_millis()));
    }

    fn polling_already_running(&self) {
        self.push("already_running".into());
    }

    fn polling_stopped(&self) {
        self.push("stopped".into());
    }

    fn polling_not_running(&self) {
        self.push("not_running".into());
    }

    fn interval_updated(&self, interval: Duration, polling: bool) {
        self.push(format!("interval:{}:{polling}", interval.as_millis()));
    }
}

/// Renderer that keeps the rendered text.
#[derive(Default)]
pub struct CapturingRenderer {
    pub rendered: Mutex<Vec<String>>,
}

impl ReportRenderer for CapturingRenderer {
    fn render(&self, report: &UsageReport) -> Result<(), AppError> {
        self.rendered.lock().unwrap().push(report.to_string());
        Ok(())
    }
}

/// Prometheus success body with one unlabeled sample.
pub fn prometheus_scalar(value: &str) -> Value {
    json!({
        "status": "success",
        "data": {"resultType": "vector", "result": [{"metric": {}, "value": [1_700_000_000, value]}]}
    })
}

/// Prometheus success body with one sample per `(label value, sample)`.
pub fn prometheus_by(label: &str, rows: &[(&str, &str)]) -> Value {
    let result: Vec<Value> = rows
        .iter()
        .map(|(tag, value)| json!({"metric": {label: tag}, "value": [1_700_000_000, value]}))
        .collect();
    json!({"status": "success", "data": {"resultType": "vector", "result": result}})
}

/// Mount a Prometheus answer for one expression.
pub async fn mount_prometheus(server: &MockServer, expression: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/v1/query"))
        .and(query_param("query", expression))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a Datadog answer for one expression.
pub async fn mount_datadog(server: &MockServer, expression: &str, series: Value) {
    Mock::given(method("GET"))
        .and(path("/api/v1/query"))
        .and(query_param("query", expression))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "series": series})),
        )
        .mount(server)
        .await;
}

/// Fallback for any other query: an empty but successful Prometheus body.
pub async fn mount_prometheus_empty(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"resultType": "vector", "result": []}
        })))
        .with_priority(10)
        .mount(server)
        .await;
}
