//! Prometheus response reducers.

use super::types::{PrometheusResponse, PrometheusSeries};
use crate::metrics::{GroupedMetric, UNKNOWN_TAG};

/// Latest value of the first result row, `0` when there are no rows.
#[must_use]
pub fn extract_scalar(response: &PrometheusResponse) -> f64 {
    response.data.result.first().map_or(0.0, latest_value)
}

/// Latest value per `tag_key` label. Rows missing the label land under
/// `"unknown"`; later rows overwrite earlier ones with the same key.
#[must_use]
pub fn extract_grouped(response: &PrometheusResponse, tag_key: &str) -> GroupedMetric {
    response
        .data
        .result
        .iter()
        .map(|series| {
            let key = series.label(tag_key).unwrap_or(UNKNOWN_TAG);
            (key.to_string(), latest_value(series))
        })
        .collect()
}

fn latest_value(series: &PrometheusSeries) -> f64 {
    series.latest().map_or(0.0, super::Sample::value)
}
