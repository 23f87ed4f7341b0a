//! Datadog response reducers.

use regex::Regex;

use super::types::{DatadogResponse, DatadogSeries};
use crate::metrics::{GroupedMetric, UNKNOWN_TAG};

/// Value of the last point of the first series, `0` when there is none.
///
/// Points are taken in response order; they are not re-sorted by timestamp.
#[must_use]
pub fn extract_scalar(response: &DatadogResponse) -> f64 {
    response.series().first().map_or(0.0, latest_value)
}

/// Latest value per `tag_key` value parsed from each series' scope. Series
/// whose scope lacks the tag land under `"unknown"`; later series overwrite
/// earlier ones with the same key.
#[must_use]
pub fn extract_grouped(response: &DatadogResponse, tag_key: &str) -> GroupedMetric {
    let pattern = tag_pattern(tag_key);
    response
        .series()
        .iter()
        .map(|series| {
            let key = pattern
                .as_ref()
                .and_then(|re| capture_tag(re, &series.scope))
                .unwrap_or(UNKNOWN_TAG);
            (key.to_string(), latest_value(series))
        })
        .collect()
}

/// Value of `tag_key` in a scope string such as `model:claude-4,env:prod`.
#[must_use]
pub fn scope_tag<'a>(scope: &'a str, tag_key: &str) -> Option<&'a str> {
    tag_pattern(tag_key).and_then(|re| capture_tag(&re, scope))
}

/// `tag_key:VALUE` at the start of the scope or after a separator. The
/// value runs to the next `,` or `}`.
fn tag_pattern(tag_key: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?:^|[,{{\s]){}:([^,}}]+)", regex::escape(tag_key))).ok()
}

fn capture_tag<'a>(re: &Regex, scope: &'a str) -> Option<&'a str> {
    re.captures(scope)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
}

fn latest_value(series: &DatadogSeries) -> f64 {
    series.latest().map_or(0.0, super::Point::value)
}
