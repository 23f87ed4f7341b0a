//! Prometheus-style query backend.
//!
//! Queries `GET {base_url}/api/v1/query?query=<expr>` and reduces
//! instant-vector (or range-matrix) results.
//!
//! # Example
//!
//! ```
//! use usage_monitor::backend::prometheus::{extract_scalar, PrometheusResponse};
//!
//! let body = r#"{"status":"success","data":{"resultType":"vector",
//!     "result":[{"metric":{},"value":[1700000000,"42"]}]}}"#;
//! let response: PrometheusResponse = serde_json::from_str(body).unwrap();
//! assert_eq!(extract_scalar(&response), 42.0);
//! ```

mod client;
mod reducer;
mod types;

pub use client::{PrometheusClient, PrometheusConfig, DEFAULT_PROMETHEUS_URL};
pub use reducer::{extract_grouped, extract_scalar};
pub use types::{PrometheusData, PrometheusResponse, PrometheusSeries, Sample};

use crate::metrics::{GroupedQuery, MetricName, MetricSet, QuerySpec};

/// Prometheus query table.
pub static PROMETHEUS_METRICS: MetricSet = MetricSet {
    scalars: [
        QuerySpec::new(
            MetricName::SessionCount,
            "sum(claude_code_claude_code_session_count_total)",
        ),
        QuerySpec::new(
            MetricName::TotalTokensUsed,
            "sum(claude_code_claude_code_token_usage_tokens_total)",
        ),
        QuerySpec::new(
            MetricName::TotalCost,
            "sum(claude_code_claude_code_cost_usage_USD_total)",
        ),
        QuerySpec::new(
            MetricName::LinesOfCodeAdded,
            r#"sum(claude_code_claude_code_lines_of_code_count_total{type="added"})"#,
        ),
        QuerySpec::new(
            MetricName::LinesOfCodeRemoved,
            r#"sum(claude_code_claude_code_lines_of_code_count_total{type="removed"})"#,
        ),
        QuerySpec::new(
            MetricName::CommitsCreated,
            "sum(claude_code_claude_code_commit_count_total)",
        ),
        QuerySpec::new(
            MetricName::PullRequestsCreated,
            "sum(claude_code_claude_code_pull_request_count_total)",
        ),
    ],
    token_usage_by_type: GroupedQuery {
        expression: "sum by (type) (claude_code_claude_code_token_usage_tokens_total)",
        tag_key: "type",
    },
    cost_by_model: GroupedQuery {
        expression: "sum by (model) (claude_code_claude_code_cost_usage_USD_total)",
        tag_key: "model",
    },
};
