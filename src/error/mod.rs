//! Error types for the usage monitor.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`QueryError`]: A single backend query that failed
//! - [`QueryFailure`]: Why a query failed (transport or protocol)
//! - [`ConfigError`]: Configuration errors
//! - [`CliError`]: Command-line parsing errors
//!
//! Query errors never escape the collector: they are converted to default
//! values there. All errors implement `Send + Sync` for async compatibility.

use thiserror::Error;

use crate::backend::BackendKind;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// A backend query failed.
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Command-line error.
    #[error("Command-line error: {0}")]
    Cli(#[from] CliError),

    /// Writing the report failed.
    #[error("Render error: {0}")]
    Render(#[from] std::io::Error),

    /// The startup connection check failed.
    #[error("Failed to connect to {backend}")]
    ConnectionFailed {
        /// Backend that failed the check.
        backend: BackendKind,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {message}")]
    ClientBuild {
        /// Description of the failure.
        message: String,
    },
}

/// A failed query against a metrics backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{backend} query `{expression}` failed: {cause}")]
pub struct QueryError {
    /// Backend the query was sent to.
    pub backend: BackendKind,
    /// The query expression.
    pub expression: String,
    /// Underlying cause.
    pub cause: QueryFailure,
}

impl QueryError {
    /// Create a new query error.
    #[must_use]
    pub fn new(backend: BackendKind, expression: impl Into<String>, cause: QueryFailure) -> Self {
        Self {
            backend,
            expression: expression.into(),
            cause,
        }
    }
}

/// Cause of a failed query.
///
/// `Transport` and `Timeout` are transport errors; `HttpStatus`, `Decode` and
/// `Backend` are protocol errors. An empty result is not an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryFailure {
    /// Network or DNS failure.
    #[error("Network error: {message}")]
    Transport {
        /// Description of the network error.
        message: String,
    },

    /// Request timed out.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Non-success HTTP status.
    #[error("HTTP status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body (possibly empty).
        body: String,
    },

    /// Body was not the expected JSON shape.
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },

    /// Body decoded but reported `status: "error"`.
    #[error("Backend reported error: {message}")]
    Backend {
        /// Error message from the body.
        message: String,
    },
}

impl QueryFailure {
    /// Returns true for network-level failures.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}

/// Configuration errors.
///
/// These errors represent failures in configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required configuration is missing.
    #[error("Missing required: {var}")]
    MissingRequired {
        /// The missing variable name.
        var: String,
    },

    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}

/// Command-line parsing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CliError {
    /// Unrecognized flag.
    #[error("Unknown flag: {0}")]
    UnknownFlag(String),

    /// Flag requires a value that was not supplied.
    #[error("Missing value for {0}")]
    MissingValue(String),

    /// Flag value could not be parsed.
    #[error("Invalid value for {flag}: {value}")]
    InvalidValue {
        /// The flag.
        flag: String,
        /// The rejected value.
        value: String,
    },
}
