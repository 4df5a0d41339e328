//! Smsgate HTTP Client
//!
//! A simple, type-safe HTTP client for communicating with the remote SMS
//! job queue.
//!
//! The queue exposes a single endpoint: `GET` returns the next pending
//! job (if any) wrapped in an envelope, `POST` acknowledges a job with the
//! outcome of its send attempt.
//!
//! # Example
//!
//! ```no_run
//! use smsgate_client::QueueClient;
//! use smsgate_core::domain::job::DispatchStatus;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), smsgate_client::ClientError> {
//!     let client = QueueClient::new("http://localhost:8080/api/sms/sync");
//!
//!     if let Some(job) = client.fetch_next().await? {
//!         // hand job.phone / job.message to the send capability ...
//!         client.acknowledge(&job.id, DispatchStatus::Sent).await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the SMS job queue
///
/// Both operations of the wire protocol go to the same configured
/// endpoint URL:
/// - `fetch_next`: `GET`, returns the next claimed job or nothing
/// - `acknowledge`: `POST`, reports the send attempt for one job
#[derive(Debug, Clone)]
pub struct QueueClient {
    /// Full queue endpoint URL (e.g., "http://localhost:8080/api/sms/sync")
    endpoint: String,
    /// HTTP client instance
    client: Client,
}

impl QueueClient {
    /// Create a new queue client
    ///
    /// # Arguments
    /// * `endpoint` - The queue endpoint URL
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a new queue client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use smsgate_client::QueueClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(15))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = QueueClient::with_client("http://localhost:8080/api/sms/sync", http_client);
    /// ```
    pub fn with_client(endpoint: impl Into<String>, client: Client) -> Self {
        let endpoint = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the queue endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle a queue response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the
    /// request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle a queue response whose body is not inspected
    ///
    /// Checks the status code and returns an error if the request failed.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}
