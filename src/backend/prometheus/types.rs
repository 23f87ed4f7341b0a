//! Prometheus query API response types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Body of `GET /api/v1/query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrometheusResponse {
    /// `success` or `error`.
    pub status: String,
    /// Result payload (absent on errors).
    #[serde(default)]
    pub data: PrometheusData,
    /// Error message when `status` is `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PrometheusResponse {
    /// Whether the backend reported an error in the body.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

/// The `data` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrometheusData {
    /// `vector`, `matrix`, `scalar` or `string`.
    #[serde(default)]
    pub result_type: String,
    /// Result rows in response order.
    #[serde(default)]
    pub result: Vec<PrometheusSeries>,
}

/// One result row.
///
/// Instant vectors carry `value`; range matrices carry `values`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrometheusSeries {
    /// Label set.
    #[serde(default)]
    pub metric: HashMap<String, String>,
    /// Instant sample.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Sample>,
    /// Range samples, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Sample>,
}

impl PrometheusSeries {
    /// The last sample in response order.
    #[must_use]
    pub fn latest(&self) -> Option<&Sample> {
        self.values.last().or(self.value.as_ref())
    }

    /// Label value, treating empty labels as absent.
    #[must_use]
    pub fn label(&self, name: &str) -> Option<&str> {
        self.metric
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// A `[timestamp, "value"]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample(pub f64, pub String);

impl Sample {
    /// Sample timestamp in unix seconds.
    #[must_use]
    pub const fn timestamp(&self) -> f64 {
        self.0
    }

    /// Numeric value; unparsable or non-finite values read as `0`.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.1
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .unwrap_or(0.0)
    }
}
