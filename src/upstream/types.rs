//! Upstream error definitions.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to the document store.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The store answered with a non-success status.
    #[error("JSON Server responded with status: {}", .0.as_u16())]
    Status(StatusCode),

    /// The call did not complete within the configured timeout.
    #[error("Upstream request timed out")]
    Timeout,

    /// The configured base URL cannot carry a `blogs` path.
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Connection, protocol or body decoding failure.
    #[error("Upstream transport error: {0}")]
    Transport(#[source] reqwest::Error),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
