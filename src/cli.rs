//! Command-line arguments.
//!
//! ```text
//! claude-usage-monitor [--datadog] [--poll [<ms>]] [--help]
//! ```
//!
//! Without `--poll` the monitor prints one report and exits. `--poll` with no
//! value uses the configured interval.

use std::time::Duration;

use crate::backend::BackendKind;
use crate::error::CliError;

/// Smallest accepted `--poll` interval.
pub const MIN_POLL_INTERVAL_MS: u64 = 1_000;

/// Usage text printed for `--help`.
pub const USAGE: &str = "\
Usage: claude-usage-monitor [OPTIONS]

Options:
  --datadog      Query the Datadog metrics API instead of Prometheus
  --poll [<ms>]  Refresh the report every <ms> milliseconds until Ctrl+C
  -h, --help     Print this help

Environment:
  PROMETHEUS_URL            Prometheus base URL (default http://localhost:9090)
  PROMETHEUS_BEARER_TOKEN   Optional bearer token for Prometheus
  DD_API_KEY                Datadog API key (required with --datadog)
  DD_APPLICATION_KEY        Datadog application key (required with --datadog)
  DD_SITE                   Datadog site (default datadoghq.com)
  POLL_INTERVAL_MS          Interval for --poll without a value (default 30000)
  LOOKBACK_SECS             Query window in seconds (default 3600)
  REQUEST_TIMEOUT_MS        Per-request timeout (default 30000)
  LOG_LEVEL                 Log filter (default info)
";

/// Parsed command-line arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CliArgs {
    /// Backend selected by `--datadog`.
    pub backend: BackendKind,
    /// `--poll` was given.
    pub poll: bool,
    /// Interval given to `--poll`, if any.
    pub poll_interval: Option<Duration>,
    /// `--help` was given.
    pub help: bool,
}

impl CliArgs {
    /// Parse arguments, excluding the program name.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] for unknown flags, or a `--poll` value that is
    /// not a whole number of milliseconds of at least
    /// [`MIN_POLL_INTERVAL_MS`].
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let mut parsed = Self::default();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--datadog" => parsed.backend = BackendKind::Datadog,
                "-h" | "--help" => parsed.help = true,
                "--poll" => {
                    parsed.poll = true;
                    if let Some(value) = args.get(i + 1).filter(|v| !v.starts_with("--")) {
                        parsed.poll_interval = Some(parse_interval("--poll", value)?);
                        i += 1;
                    }
                }
                arg => {
                    if let Some(value) = arg.strip_prefix("--poll=") {
                        if value.is_empty() {
                            return Err(CliError::MissingValue("--poll".into()));
                        }
                        parsed.poll = true;
                        parsed.poll_interval = Some(parse_interval("--poll", value)?);
                    } else {
                        return Err(CliError::UnknownFlag(arg.to_string()));
                    }
                }
            }
            i += 1;
        }
        Ok(parsed)
    }

    /// Whether scheduled mode was requested.
    #[must_use]
    pub const fn is_polling(&self) -> bool {
        self.poll
    }
}

fn parse_interval(flag: &str, value: &str) -> Result<Duration, CliError> {
    let invalid = || CliError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    };
    let ms: u64 = value.trim().parse().map_err(|_| invalid())?;
    if ms < MIN_POLL_INTERVAL_MS {
        return Err(invalid());
    }
    Ok(Duration::from_millis(ms))
}
