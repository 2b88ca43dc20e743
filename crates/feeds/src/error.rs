//! Error types for fetch and delivery operations.

use thiserror::Error;

/// Errors from one fetch cycle. Recovery is always the same: skip the
/// cycle and wait for the next tick.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Failed to parse payload: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// A subscriber's failure during delivery. Isolated at the bus boundary:
/// logged and swallowed, never forwarded to later subscribers or the
/// scheduler loop.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ObserverError(String);

impl ObserverError {
    pub fn new(err: impl std::fmt::Display) -> Self {
        Self(err.to_string())
    }
}
