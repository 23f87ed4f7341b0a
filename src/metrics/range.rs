//! Query time windows.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};

/// Default lookback window when no explicit range is given (one hour).
pub const DEFAULT_LOOKBACK: Duration = Duration::from_secs(3600);

/// A closed `[from, to]` query window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Window start.
    pub from: DateTime<Utc>,
    /// Window end.
    pub to: DateTime<Utc>,
}

impl TimeRange {
    /// Create a range from explicit endpoints.
    #[must_use]
    pub const fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// The window ending at `to` and spanning `lookback`.
    ///
    /// A lookback reaching past the earliest representable instant starts
    /// the window at [`DateTime::<Utc>::MIN_UTC`].
    #[must_use]
    pub fn ending_at(to: DateTime<Utc>, lookback: Duration) -> Self {
        let from = chrono::Duration::from_std(lookback)
            .ok()
            .and_then(|lookback| to.checked_sub_signed(lookback))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { from, to }
    }

    /// The window ending now.
    #[must_use]
    pub fn last(lookback: Duration) -> Self {
        Self::ending_at(Utc::now(), lookback)
    }

    /// Start as unix seconds.
    #[must_use]
    pub fn from_unix(&self) -> i64 {
        self.from.timestamp()
    }

    /// End as unix seconds.
    #[must_use]
    pub fn to_unix(&self) -> i64 {
        self.to.timestamp()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.from.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.to.to_rfc3339_opts(SecondsFormat::Millis, true)
        )
    }
}
