//! Network Error Types

use thiserror::Error;

/// Errors from the notification transports and REST calls.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Request could not be built or completed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP error: {0}")]
    Http(u16),

    /// A response body or stream frame failed to decode.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The push stream ended or broke mid-read.
    #[error("stream closed: {0}")]
    StreamClosed(String),

    /// Reconnect attempts exhausted.
    #[error("max reconnect attempts exceeded")]
    MaxRetriesExceeded,
}

/// Result type for network operations.
pub type NetworkResult<T> = Result<T, NetworkError>;
