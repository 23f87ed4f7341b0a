//! Datadog metrics query backend.
//!
//! Queries `GET {base_url}/api/v1/query?from=&to=&query=` with the
//! `DD-API-KEY` and `DD-APPLICATION-KEY` headers, and checks credentials
//! against `GET {base_url}/api/v1/validate`.
//!
//! Series carry their tag values in a `scope` string such as
//! `model:claude-4,env:prod`; grouping parses the tag back out of it.

mod client;
mod reducer;
mod types;

pub use client::{DatadogClient, DatadogConfig, DEFAULT_DATADOG_SITE};
pub use reducer::{extract_grouped, extract_scalar, scope_tag};
pub use types::{DatadogResponse, DatadogSeries, Point, ValidateResponse};

use crate::metrics::{GroupedQuery, MetricName, MetricSet, QuerySpec};

/// Datadog query table.
pub static DATADOG_METRICS: MetricSet = MetricSet {
    scalars: [
        QuerySpec::new(MetricName::SessionCount, "sum:claude_code.session.count{*}"),
        QuerySpec::new(MetricName::TotalTokensUsed, "sum:claude_code.token.usage{*}"),
        QuerySpec::new(MetricName::TotalCost, "sum:claude_code.cost.usage{*}"),
        QuerySpec::new(
            MetricName::LinesOfCodeAdded,
            "sum:claude_code.lines_of_code.count{type:added}",
        ),
        QuerySpec::new(
            MetricName::LinesOfCodeRemoved,
            "sum:claude_code.lines_of_code.count{type:removed}",
        ),
        QuerySpec::new(MetricName::CommitsCreated, "sum:claude_code.commit.count{*}"),
        QuerySpec::new(
            MetricName::PullRequestsCreated,
            "sum:claude_code.pull_request.count{*}",
        ),
    ],
    token_usage_by_type: GroupedQuery {
        expression: "sum:claude_code.token.usage{*} by {type}",
        tag_key: "type",
    },
    cost_by_model: GroupedQuery {
        expression: "sum:claude_code.cost.usage{*} by {model}",
        tag_key: "model",
    },
};
