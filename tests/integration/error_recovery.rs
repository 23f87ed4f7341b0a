//! Partial failure handling.
//!
//! A failing query degrades its own field to zero (or its group to empty)
//! and never takes siblings down with it.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::sync::Arc;

use serde_json::json;
use usage_monitor::backend::datadog::{DatadogClient, DatadogConfig, DATADOG_METRICS};
use usage_monitor::backend::prometheus::{PrometheusClient, PrometheusConfig, PROMETHEUS_METRICS};
use usage_monitor::backend::MetricsBackend;
use usage_monitor::collector::MetricsCollector;
use usage_monitor::error::QueryFailure;
use usage_monitor::metrics::{MetricName, UsageMetrics};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{mount_prometheus, prometheus_scalar, RecordingObserver};

#[tokio::test]
async fn test_one_failing_query_is_isolated() {
    let server = MockServer::start().await;
    let failing = PROMETHEUS_METRICS.expression(MetricName::LinesOfCodeRemoved).unwrap();
    Mock::given(method("GET"))
        .and(path("/api/v1/query"))
        .and(query_param("query", failing))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    for spec in PROMETHEUS_METRICS.scalars {
        if spec.expression != failing {
            mount_prometheus(&server, spec.expression, prometheus_scalar("5")).await;
        }
    }

    let observer = Arc::new(RecordingObserver::default());
    let client = PrometheusClient::new(PrometheusConfig::new().with_base_url(server.uri())).unwrap();
    let metrics = MetricsCollector::with_observer(Arc::new(client), observer.clone())
        .get_metrics(None)
        .await;

    for name in MetricName::ALL {
        let expected = if name == MetricName::LinesOfCodeRemoved { 0.0 } else { 5.0 };
        assert_eq!(metrics.get(name), expected, "{name}");
    }
    assert_eq!(observer.events(), vec!["metric_failed:linesOfCodeRemoved".to_string()]);
}

#[tokio::test]
async fn test_unreachable_backend_yields_zero_snapshot() {
    let observer = Arc::new(RecordingObserver::default());
    let client = PrometheusClient::new(
        PrometheusConfig::new()
            .with_base_url("http://127.0.0.1:1")
            .with_timeout_ms(1_000),
    )
    .unwrap();
    let collector = MetricsCollector::with_observer(Arc::new(client), observer.clone());

    assert_eq!(collector.get_metrics(None).await, UsageMetrics::default());
    assert_eq!(observer.count("metric_failed:"), 7);

    assert!(collector.get_token_usage_by_type(None).await.is_empty());
    assert_eq!(observer.count("grouped_failed:token usage by type"), 1);
}

#[tokio::test]
async fn test_undecodable_body_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = DatadogClient::new(DatadogConfig::new("a", "b").with_base_url(server.uri())).unwrap();
    let err = client
        .query(DATADOG_METRICS.cost_by_model.expression, None)
        .await
        .unwrap_err();
    assert!(matches!(err.cause, QueryFailure::Decode { .. }));
    assert!(!err.cause.is_transport());
}

#[tokio::test]
async fn test_grouped_failure_returns_empty_datadog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/query"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"errors": ["Forbidden"]})))
        .mount(&server)
        .await;

    let observer = Arc::new(RecordingObserver::default());
    let client = DatadogClient::new(DatadogConfig::new("a", "b").with_base_url(server.uri())).unwrap();
    let collector = MetricsCollector::with_observer(Arc::new(client), observer.clone());

    assert!(collector.get_cost_by_model(None).await.is_empty());
    assert_eq!(observer.events(), vec!["grouped_failed:cost by model".to_string()]);
}
