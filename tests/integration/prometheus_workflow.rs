//! Prometheus workflow: query → reduce → snapshot → report.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use usage_monitor::backend::prometheus::{PrometheusClient, PrometheusConfig, PROMETHEUS_METRICS};
use usage_monitor::collector::MetricsCollector;
use usage_monitor::metrics::{GroupedMetric, MetricName, UsageMetrics};
use usage_monitor::monitor::UsageMonitor;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{
    mount_prometheus, mount_prometheus_empty, prometheus_by, prometheus_scalar,
    CapturingRenderer, RecordingObserver,
};

fn client(server: &MockServer) -> PrometheusClient {
    PrometheusClient::new(
        PrometheusConfig::new()
            .with_base_url(server.uri())
            .with_timeout_ms(5_000),
    )
    .unwrap()
}

fn expression(metric: MetricName) -> &'static str {
    PROMETHEUS_METRICS.expression(metric).unwrap()
}

#[tokio::test]
async fn test_session_count_only_snapshot() {
    let server = MockServer::start().await;
    mount_prometheus(&server, expression(MetricName::SessionCount), prometheus_scalar("42")).await;
    mount_prometheus_empty(&server).await;

    let observer = Arc::new(RecordingObserver::default());
    let collector = MetricsCollector::with_observer(Arc::new(client(&server)), observer.clone());

    let metrics = collector.get_metrics(None).await;
    assert_eq!(
        metrics,
        UsageMetrics {
            session_count: 42.0,
            ..UsageMetrics::default()
        }
    );
    assert!(observer.events().is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 7);
}

#[tokio::test]
async fn test_full_report() {
    let server = MockServer::start().await;
    mount_prometheus(&server, expression(MetricName::SessionCount), prometheus_scalar("3")).await;
    mount_prometheus(&server, expression(MetricName::TotalCost), prometheus_scalar("12.5")).await;
    mount_prometheus(
        &server,
        expression(MetricName::TotalTokensUsed),
        prometheus_scalar("1500000"),
    )
    .await;
    mount_prometheus(
        &server,
        PROMETHEUS_METRICS.token_usage_by_type.expression,
        prometheus_by("type", &[("input", "1000000"), ("output", "500000")]),
    )
    .await;
    mount_prometheus(
        &server,
        PROMETHEUS_METRICS.cost_by_model.expression,
        prometheus_by("model", &[("claude-sonnet-4", "12.5")]),
    )
    .await;
    mount_prometheus_empty(&server).await;

    let renderer = Arc::new(CapturingRenderer::default());
    let monitor = UsageMonitor::new(MetricsCollector::new(client(&server)), renderer.clone());
    let report = monitor.run_once().await.unwrap();

    assert_eq!(report.metrics.session_count, 3.0);
    assert_eq!(
        report.tokens_by_type,
        GroupedMetric::from([("input".to_string(), 1e6), ("output".to_string(), 5e5)])
    );

    let rendered = renderer.rendered.lock().unwrap();
    assert_eq!(rendered.len(), 1);
    let text = &rendered[0];
    assert!(text.starts_with("📊 Claude Code Usage Report\n"));
    assert!(text.contains("  Total Cost: $12.50\n"));
    assert!(text.contains("  Total Tokens: 1,500,000\n"));
    assert!(text.contains("  input: 1,000,000\n"));
    assert!(text.contains("  claude-sonnet-4: $12.50\n"));
    assert!(!text.contains("Time Range"));
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/query"))
        .and(header("Authorization", "Bearer prom-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(prometheus_scalar("1")))
        .expect(7)
        .mount(&server)
        .await;

    let client = PrometheusClient::new(
        PrometheusConfig::new()
            .with_base_url(server.uri())
            .with_bearer_token("prom-secret"),
    )
    .unwrap();
    let metrics = MetricsCollector::new(client).get_metrics(None).await;

    for name in MetricName::ALL {
        assert_eq!(metrics.get(name), 1.0, "{name}");
    }
}

#[tokio::test]
async fn test_unlabeled_group_rows_fall_back_to_unknown() {
    let server = MockServer::start().await;
    mount_prometheus(
        &server,
        PROMETHEUS_METRICS.cost_by_model.expression,
        prometheus_by("instance", &[("host-a", "2.5")]),
    )
    .await;

    let collector = MetricsCollector::new(client(&server));
    let costs = collector.get_cost_by_model(None).await;
    assert_eq!(costs, GroupedMetric::from([("unknown".to_string(), 2.5)]));
}

#[tokio::test]
async fn test_connection_check_always_passes() {
    // No validate endpoint: nothing is mounted and nothing is called.
    let server = MockServer::start().await;
    let collector = MetricsCollector::new(client(&server));

    assert!(collector.check_connection().await);
    assert!(server.received_requests().await.unwrap().is_empty());
}
