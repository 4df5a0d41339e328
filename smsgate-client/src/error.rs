//! Error types for the queue client

use thiserror::Error;

/// Result type alias for queue client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the job queue
///
/// Every variant is transient from the poller's point of view: the next
/// poll tick is the retry.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (timeout, DNS, connection refused)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Queue returned an error status code
    #[error("queue error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the queue
        message: String,
    },

    /// Response body does not parse as the expected shape
    #[error("failed to parse response: {0}")]
    ParseError(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}
