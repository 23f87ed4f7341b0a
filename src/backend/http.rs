//! Shared request execution for the query clients.

#![allow(clippy::cast_possible_truncation)]

use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use super::BackendKind;
use crate::error::{AppError, QueryError, QueryFailure};

/// Build a `reqwest` client with the given timeout.
pub(crate) fn build_client(timeout_ms: u64) -> Result<Client, AppError> {
    Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .map_err(|e| AppError::ClientBuild {
            message: e.to_string(),
        })
}

/// Send `request` and decode a JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
    backend: BackendKind,
    expression: &str,
    timeout_ms: u64,
) -> Result<T, QueryError> {
    let fail = |cause| QueryError::new(backend, expression, cause);
    let start = Instant::now();

    tracing::debug!(backend = %backend, expression, "Sending metrics query");

    let response = request.send().await.map_err(|e| {
        let elapsed_ms = start.elapsed().as_millis() as u64;
        if e.is_timeout() {
            tracing::error!(
                backend = %backend,
                elapsed_ms,
                timeout_ms,
                "Metrics query timed out"
            );
            fail(QueryFailure::Timeout { timeout_ms })
        } else {
            tracing::error!(backend = %backend, elapsed_ms, error = %e, "Metrics query failed");
            fail(QueryFailure::Transport {
                message: e.to_string(),
            })
        }
    })?;

    let status = response.status();
    tracing::debug!(
        backend = %backend,
        status = %status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Metrics query response received"
    );

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(fail(QueryFailure::HttpStatus {
            status: status.as_u16(),
            body,
        }));
    }

    response.json().await.map_err(|e| {
        fail(QueryFailure::Decode {
            message: e.to_string(),
        })
    })
}
