//! Usage report rendering.
//!
//! [`UsageReport`] bundles one snapshot with the grouped breakdowns and
//! renders as plain text through `Display`. [`ConsoleRenderer`] writes it to
//! stdout.

use std::fmt::{self, Write as _};
use std::io::Write as _;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;
use crate::error::AppError;
use crate::metrics::{GroupedMetric, TimeRange, UsageMetrics};

/// Everything one report shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    /// Backend the numbers came from.
    pub backend: BackendKind,
    /// Explicit window, or `None` for the backend default.
    #[serde(skip)]
    pub range: Option<TimeRange>,
    /// Default window length, shown when `range` is `None`.
    #[serde(skip)]
    pub lookback: Duration,
    /// Overall metrics.
    pub metrics: UsageMetrics,
    /// Token usage by type.
    pub tokens_by_type: GroupedMetric,
    /// Cost by model.
    pub cost_by_model: GroupedMetric,
}

impl UsageReport {
    fn title(&self) -> &'static str {
        match self.backend {
            BackendKind::Prometheus => "📊 Claude Code Usage Report",
            BackendKind::Datadog => "📊 Claude Code Usage Report (Datadog)",
        }
    }

    fn time_range(&self) -> String {
        self.range
            .map_or_else(|| format!("Last {}", describe_lookback(self.lookback)), |r| r.to_string())
    }
}

impl fmt::Display for UsageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.title();
        let precision = self.backend.cost_precision();
        let m = &self.metrics;

        writeln!(f, "{title}")?;
        writeln!(f, "{}", "=".repeat(title.chars().count()))?;
        if self.backend == BackendKind::Datadog {
            writeln!(f, "📅 Time Range: {}", self.time_range())?;
        }

        writeln!(f, "\n📈 Overall Metrics:")?;
        writeln!(f, "  Sessions: {}", format_count(m.session_count))?;
        writeln!(f, "  Total Cost: ${:.precision$}", m.total_cost)?;
        writeln!(f, "  Total Tokens: {}", format_count(m.total_tokens_used))?;
        writeln!(f, "  Lines Added: {}", format_count(m.lines_of_code_added))?;
        writeln!(f, "  Lines Removed: {}", format_count(m.lines_of_code_removed))?;
        writeln!(f, "  Commits: {}", format_count(m.commits_created))?;
        writeln!(f, "  Pull Requests: {}", format_count(m.pull_requests_created))?;

        if !self.tokens_by_type.is_empty() {
            writeln!(f, "\n🎯 Token Usage by Type:")?;
            for (kind, count) in &self.tokens_by_type {
                writeln!(f, "  {kind}: {}", format_count(*count))?;
            }
        }

        if !self.cost_by_model.is_empty() {
            writeln!(f, "\n💰 Cost by Model:")?;
            for (model, cost) in &self.cost_by_model {
                writeln!(f, "  {model}: ${cost:.precision$}")?;
            }
        }
        Ok(())
    }
}

/// Renders a finished report.
pub trait ReportRenderer: Send + Sync {
    /// Render `report`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Render`] if the output cannot be written.
    fn render(&self, report: &UsageReport) -> Result<(), AppError>;
}

/// Writes reports to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleRenderer {
    refresh_interval: Option<Duration>,
}

impl ConsoleRenderer {
    /// Renderer for one-shot runs.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            refresh_interval: None,
        }
    }

    /// Renderer for polling: clears the screen and prints a refresh banner.
    #[must_use]
    pub const fn polling(interval: Duration) -> Self {
        Self {
            refresh_interval: Some(interval),
        }
    }
}

impl ReportRenderer for ConsoleRenderer {
    fn render(&self, report: &UsageReport) -> Result<(), AppError> {
        let mut out = std::io::stdout().lock();
        if let Some(interval) = self.refresh_interval {
            write!(out, "\x1B[2J\x1B[1;1H")?;
            writeln!(
                out,
                "🔄 Auto-refreshing every {}s (Press Ctrl+C to stop)\n",
                format_count(interval.as_secs_f64())
            )?;
        }
        write!(out, "{report}")?;
        out.flush()?;
        Ok(())
    }
}

/// Format a count with thousands separators, keeping up to three decimals.
#[must_use]
pub fn format_count(value: f64) -> String {
    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((&rounded, ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let mut out = String::new();
    if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        let _ = write!(out, ".{frac_part}");
    }
    out
}

fn describe_lookback(lookback: Duration) -> String {
    let secs = lookback.as_secs();
    match secs {
        3600 => "hour".to_string(),
        86_400 => "day".to_string(),
        s if s % 3600 == 0 => format!("{} hours", s / 3600),
        s if s % 60 == 0 => format!("{} minutes", s / 60),
        s => format!("{s} seconds"),
    }
}
