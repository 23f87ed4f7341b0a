//! Observability hooks.
//!
//! The collector and poller report what happened through [`MonitorObserver`]
//! instead of logging directly, so their decisions can be tested without
//! capturing log output. [`TracingObserver`] is the production implementation.

use std::time::Duration;

use crate::error::{AppError, QueryError};
use crate::metrics::MetricName;

/// Receives monitor events.
#[cfg_attr(test, mockall::automock)]
pub trait MonitorObserver: Send + Sync {
    /// A scalar metric query failed and was reported as `0`.
    fn metric_query_failed(&self, metric: MetricName, error: &QueryError);

    /// A grouped query failed and was reported as empty.
    fn grouped_query_failed(&self, query: &str, error: &QueryError);

    /// A collect-and-render cycle failed. Polling continues.
    fn cycle_failed(&self, error: &AppError);

    /// Polling started.
    fn polling_started(&self, interval: Duration);

    /// `start` was called while already polling.
    fn polling_already_running(&self);

    /// Polling stopped.
    fn polling_stopped(&self);

    /// `stop` was called while idle.
    fn polling_not_running(&self);

    /// The poll interval changed.
    fn interval_updated(&self, interval: Duration, polling: bool);
}

/// Logs monitor events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl MonitorObserver for TracingObserver {
    fn metric_query_failed(&self, metric: MetricName, error: &QueryError) {
        tracing::warn!(metric = %metric, error = %error, "Failed to fetch metric");
    }

    fn grouped_query_failed(&self, query: &str, error: &QueryError) {
        tracing::error!(query, error = %error, "Failed to fetch grouped metric");
    }

    fn cycle_failed(&self, error: &AppError) {
        tracing::error!(error = %error, "Error during polling");
    }

    fn polling_started(&self, interval: Duration) {
        tracing::info!(
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            "Starting Claude Code monitoring"
        );
    }

    fn polling_already_running(&self) {
        tracing::info!("Polling is already running");
    }

    fn polling_stopped(&self) {
        tracing::info!("Polling stopped");
    }

    fn polling_not_running(&self) {
        tracing::info!("Polling is not running");
    }

    fn interval_updated(&self, interval: Duration, polling: bool) {
        let interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        if polling {
            tracing::info!(interval_ms, "Poll interval updated; applies from the next wait");
        } else {
            tracing::debug!(interval_ms, "Poll interval updated");
        }
    }
}
