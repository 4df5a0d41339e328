//! Job queue operations

use smsgate_core::domain::job::{DispatchStatus, Job};
use smsgate_core::dto::job::{AckRequest, FetchEnvelope};
use tracing::{debug, warn};

use crate::QueueClient;
use crate::error::Result;

impl QueueClient {
    /// Fetch the next pending job from the queue
    ///
    /// Returns `None` when no job is pending. A returned job is claimed
    /// for this poller: the queue must not re-issue it until it is
    /// acknowledged or its lease expires.
    ///
    /// An envelope with `success=false` is treated as an empty queue,
    /// matching the behavior the wire protocol's producers expect.
    pub async fn fetch_next(&self) -> Result<Option<Job>> {
        debug!("Fetching next job from {}", self.endpoint);

        let response = self.client.get(&self.endpoint).send().await?;
        let envelope: FetchEnvelope = self.handle_response(response).await?;

        if !envelope.success {
            warn!("Queue reported success=false, treating as no pending job");
            return Ok(None);
        }

        Ok(envelope.data)
    }

    /// Acknowledge a job with the outcome of its send attempt
    ///
    /// The response body is not inspected; a non-2xx status surfaces as
    /// an error.
    ///
    /// # Arguments
    /// * `job_id` - The ID of the job being acknowledged
    /// * `status` - The outcome of the send attempt
    pub async fn acknowledge(&self, job_id: &str, status: DispatchStatus) -> Result<()> {
        debug!("Acknowledging job {} as {}", job_id, status);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&AckRequest {
                id: job_id.to_string(),
                status,
            })
            .send()
            .await?;

        self.handle_empty_response(response).await
    }
}
