//! Redacted credential strings.

use std::fmt;

const REDACTED: &str = "<REDACTED>";

/// A credential that never prints its value.
///
/// Holds Datadog API/application keys and Prometheus bearer tokens. `Debug`
/// and `Display` both print `<REDACTED>`; the value is only reachable through
/// [`expose`](Self::expose) when building a request header.
///
/// # Example
///
/// ```
/// use usage_monitor::config::SecretString;
///
/// let key = SecretString::new("dd-api-0123456789");
/// assert_eq!(format!("{key:?}"), "<REDACTED>");
/// assert_eq!(key.expose(), "dd-api-0123456789");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Wrap a credential.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value, for request headers only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True if the value is empty or only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
