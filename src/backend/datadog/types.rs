//! Datadog v1 API response types.

use serde::{Deserialize, Serialize};

/// Body of `GET /api/v1/query`.
///
/// Only the fields the monitor reads are modeled; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatadogResponse {
    /// `ok` or `error`.
    #[serde(default)]
    pub status: String,
    /// Result series; `null` and absent both mean none.
    #[serde(default)]
    pub series: Option<Vec<DatadogSeries>>,
    /// Error message when `status` is `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Query window start (ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_date: Option<i64>,
    /// Query window end (ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_date: Option<i64>,
}

impl DatadogResponse {
    /// Series in response order.
    #[must_use]
    pub fn series(&self) -> &[DatadogSeries] {
        self.series.as_deref().unwrap_or_default()
    }

    /// Whether the backend reported an error in the body.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

/// One timeseries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatadogSeries {
    /// Metric name.
    #[serde(default)]
    pub metric: String,
    /// Resolved tag filters, e.g. `model:claude-4,env:prod`.
    #[serde(default)]
    pub scope: String,
    /// Points, assumed oldest first.
    #[serde(default)]
    pub pointlist: Option<Vec<Point>>,
}

impl DatadogSeries {
    /// Points in response order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        self.pointlist.as_deref().unwrap_or_default()
    }

    /// The last point in response order.
    #[must_use]
    pub fn latest(&self) -> Option<&Point> {
        self.points().last()
    }
}

/// A `[timestamp_ms, value]` pair. The value may be `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point(pub f64, pub Option<f64>);

impl Point {
    /// Timestamp in unix milliseconds.
    #[must_use]
    pub const fn timestamp_ms(&self) -> f64 {
        self.0
    }

    /// Value; `null` and NaN read as `0`.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.1.filter(|value| value.is_finite()).unwrap_or(0.0)
    }
}

/// Body of `GET /api/v1/validate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateResponse {
    /// Whether the API key is valid.
    #[serde(default)]
    pub valid: bool,
}
