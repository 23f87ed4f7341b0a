//! Collect-and-render cycle.
//!
//! [`UsageMonitor`] ties a [`MetricsCollector`] to a [`ReportRenderer`]. It is
//! the unit of work the [`Poller`](crate::poller::Poller) repeats, and what
//! one-shot runs call directly.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::MetricsBackend;
use crate::collector::MetricsCollector;
use crate::error::AppError;
use crate::metrics::{TimeRange, DEFAULT_LOOKBACK};
use crate::poller::PollCycle;
use crate::report::{ReportRenderer, UsageReport};

/// Collects a full report from one backend and renders it.
pub struct UsageMonitor<B> {
    collector: MetricsCollector<B>,
    renderer: Arc<dyn ReportRenderer>,
    range: Option<TimeRange>,
    lookback: Duration,
}

impl<B: MetricsBackend> UsageMonitor<B> {
    /// Create a monitor using the backend's default window.
    #[must_use]
    pub fn new(collector: MetricsCollector<B>, renderer: Arc<dyn ReportRenderer>) -> Self {
        Self {
            collector,
            renderer,
            range: None,
            lookback: DEFAULT_LOOKBACK,
        }
    }

    /// Query an explicit window instead of the backend default.
    #[must_use]
    pub const fn with_range(mut self, range: TimeRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Length of the backend's default window, shown in reports.
    #[must_use]
    pub const fn with_lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }

    /// The underlying collector.
    #[must_use]
    pub const fn collector(&self) -> &MetricsCollector<B> {
        &self.collector
    }

    /// Collect the snapshot and both breakdowns concurrently.
    pub async fn usage_report(&self) -> UsageReport {
        let (metrics, tokens_by_type, cost_by_model) = tokio::join!(
            self.collector.get_metrics(self.range),
            self.collector.get_token_usage_by_type(self.range),
            self.collector.get_cost_by_model(self.range),
        );

        UsageReport {
            backend: self.collector.backend().kind(),
            range: self.range,
            lookback: self.lookback,
            metrics,
            tokens_by_type,
            cost_by_model,
        }
    }

    /// Collect and render one report.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails. Query failures are already
    /// folded into the report as zeros or empty groups.
    pub async fn run_once(&self) -> Result<UsageReport, AppError> {
        let report = self.usage_report().await;
        self.renderer.render(&report)?;
        Ok(report)
    }
}

#[async_trait]
impl<B> PollCycle for UsageMonitor<B>
where
    B: MetricsBackend + 'static,
{
    async fn run_cycle(&self) -> Result<(), AppError> {
        self.run_once().await.map(drop)
    }
}
