//! Static query tables.

use super::MetricName;

/// A semantic metric bound to a backend-specific query expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySpec {
    /// Semantic metric name.
    pub metric: MetricName,
    /// Backend query expression.
    pub expression: &'static str,
}

impl QuerySpec {
    /// Create a query spec.
    #[must_use]
    pub const fn new(metric: MetricName, expression: &'static str) -> Self {
        Self { metric, expression }
    }
}

/// A grouping query and the tag its series are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupedQuery {
    /// Backend query expression.
    pub expression: &'static str,
    /// Tag whose value keys the result.
    pub tag_key: &'static str,
}

/// A backend's full query table.
///
/// Tables are `static` and never change at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSet {
    /// One scalar query per [`MetricName`].
    pub scalars: [QuerySpec; 7],
    /// Token usage grouped by `type`.
    pub token_usage_by_type: GroupedQuery,
    /// Cost grouped by `model`.
    pub cost_by_model: GroupedQuery,
}

impl MetricSet {
    /// Look up the expression for a metric.
    #[must_use]
    pub fn expression(&self, metric: MetricName) -> Option<&'static str> {
        self.scalars
            .iter()
            .find(|spec| spec.metric == metric)
            .map(|spec| spec.expression)
    }
}
