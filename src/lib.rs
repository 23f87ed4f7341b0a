//! Claude Code Usage Monitor
//!
//! Polls a metrics backend for Claude Code usage metrics and renders them as
//! a text report, once or on a fixed interval.
//!
//! # Features
//!
//! - Prometheus-style instant queries and the Datadog metrics query API
//!   behind one [`MetricsBackend`](backend::MetricsBackend) capability
//! - Concurrent per-metric queries with per-query failure isolation
//! - Token usage by type and cost by model breakdowns
//! - Single-flight polling with cooperative shutdown
//!
//! # Quick Start
//!
//! ```bash
//! # Prometheus, one report
//! PROMETHEUS_URL=http://localhost:9090 ./claude-usage-monitor
//!
//! # Datadog, refreshed every minute
//! DD_API_KEY=... DD_APPLICATION_KEY=... ./claude-usage-monitor --datadog --poll 60000
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌────────┐  cycle  ┌──────────────┐ get_metrics ┌──────────────────┐
//! │ Poller │────────▶│ UsageMonitor │────────────▶│ MetricsCollector │
//! └────────┘         └──────┬───────┘             └────────┬─────────┘
//!                           │ render                       │ query × N
//!                           ▼                              ▼
//!                    ReportRenderer              MetricsBackend
//!                       (stdout)             (Prometheus | Datadog)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod metrics;
pub mod monitor;
pub mod observer;
pub mod poller;
pub mod report;

#[cfg(test)]
mod test_utils;
