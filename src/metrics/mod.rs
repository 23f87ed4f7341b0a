//! Usage metrics model.
//!
//! This module provides:
//! - [`MetricName`]: the fixed set of semantic metric names
//! - [`UsageMetrics`]: one snapshot with a field per semantic name
//! - [`GroupedMetric`]: scalars keyed by a tag value
//! - [`MetricSet`]: a backend's static table of query expressions
//! - [`TimeRange`]: the query window
//!
//! # Example
//!
//! ```
//! use usage_monitor::metrics::{MetricName, UsageMetrics};
//!
//! let mut metrics = UsageMetrics::default();
//! metrics.set(MetricName::SessionCount, 42.0);
//!
//! assert_eq!(metrics.get(MetricName::SessionCount), 42.0);
//! assert_eq!(metrics.get(MetricName::TotalCost), 0.0);
//! ```

mod query;
mod range;

pub use query::{GroupedQuery, MetricSet, QuerySpec};
pub use range::{TimeRange, DEFAULT_LOOKBACK};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag value used when a series carries no value for the grouping tag.
pub const UNKNOWN_TAG: &str = "unknown";

/// Scalars keyed by tag value (token type, model name, ...).
pub type GroupedMetric = BTreeMap<String, f64>;

/// Backend-agnostic metric names.
///
/// Each variant maps to exactly one [`UsageMetrics`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricName {
    /// Number of sessions.
    SessionCount,
    /// Tokens consumed across all token types.
    TotalTokensUsed,
    /// Cost in USD.
    TotalCost,
    /// Lines of code added.
    LinesOfCodeAdded,
    /// Lines of code removed.
    LinesOfCodeRemoved,
    /// Commits created.
    CommitsCreated,
    /// Pull requests created.
    PullRequestsCreated,
}

impl MetricName {
    /// Every metric name, in report order.
    pub const ALL: [Self; 7] = [
        Self::SessionCount,
        Self::TotalTokensUsed,
        Self::TotalCost,
        Self::LinesOfCodeAdded,
        Self::LinesOfCodeRemoved,
        Self::CommitsCreated,
        Self::PullRequestsCreated,
    ];

    /// The semantic name as it appears in serialized snapshots.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SessionCount => "sessionCount",
            Self::TotalTokensUsed => "totalTokensUsed",
            Self::TotalCost => "totalCost",
            Self::LinesOfCodeAdded => "linesOfCodeAdded",
            Self::LinesOfCodeRemoved => "linesOfCodeRemoved",
            Self::CommitsCreated => "commitsCreated",
            Self::PullRequestsCreated => "pullRequestsCreated",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One collection run's snapshot.
///
/// Every field is always present; a metric whose query failed or returned
/// nothing is `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetrics {
    /// Number of sessions.
    pub session_count: f64,
    /// Tokens consumed.
    pub total_tokens_used: f64,
    /// Cost in USD.
    pub total_cost: f64,
    /// Lines of code added.
    pub lines_of_code_added: f64,
    /// Lines of code removed.
    pub lines_of_code_removed: f64,
    /// Commits created.
    pub commits_created: f64,
    /// Pull requests created.
    pub pull_requests_created: f64,
}

impl UsageMetrics {
    /// Build a snapshot from `(name, value)` pairs. Missing names stay `0`.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = (MetricName, f64)>) -> Self {
        values
            .into_iter()
            .fold(Self::default(), |mut metrics, (name, value)| {
                metrics.set(name, value);
                metrics
            })
    }

    /// Read the field for `name`.
    #[must_use]
    pub const fn get(&self, name: MetricName) -> f64 {
        match name {
            MetricName::SessionCount => self.session_count,
            MetricName::TotalTokensUsed => self.total_tokens_used,
            MetricName::TotalCost => self.total_cost,
            MetricName::LinesOfCodeAdded => self.lines_of_code_added,
            MetricName::LinesOfCodeRemoved => self.lines_of_code_removed,
            MetricName::CommitsCreated => self.commits_created,
            MetricName::PullRequestsCreated => self.pull_requests_created,
        }
    }

    /// Write the field for `name`.
    pub fn set(&mut self, name: MetricName, value: f64) {
        let field = match name {
            MetricName::SessionCount => &mut self.session_count,
            MetricName::TotalTokensUsed => &mut self.total_tokens_used,
            MetricName::TotalCost => &mut self.total_cost,
            MetricName::LinesOfCodeAdded => &mut self.lines_of_code_added,
            MetricName::LinesOfCodeRemoved => &mut self.lines_of_code_removed,
            MetricName::CommitsCreated => &mut self.commits_created,
            MetricName::PullRequestsCreated => &mut self.pull_requests_created,
        };
        *field = value;
    }
}
