//! Error types for pangolin-api

use thiserror::Error;

/// Errors that can occur when talking to the setup daemon
#[derive(Error, Debug)]
pub enum SetupApiError {
    /// Transport-level failure (connect, timeout, bad URL)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend returned HTTP {0}")]
    Http(u16),

    /// Response body was not the JSON we expected
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}
