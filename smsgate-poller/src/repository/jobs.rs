//! Jobs repository
//!
//! Handles communication with the queue for job-related operations:
//! - Fetching the next pending job
//! - Acknowledging a job with the outcome of its send attempt

use anyhow::{Context, Result};
use async_trait::async_trait;
use smsgate_core::domain::job::{DispatchStatus, Job};

use smsgate_client::QueueClient;

/// Repository trait for job operations against the queue
///
/// A fetched job is claimed for this poller: the queue must not re-issue
/// it to another consumer until it is acknowledged or its server-side
/// lease expires. The gateway relies on that contract but cannot enforce
/// it from this side.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Fetches the next pending job
    ///
    /// Returns `None` when the queue has no pending job.
    async fn fetch_next(&self) -> Result<Option<Job>>;

    /// Acknowledges a job with the outcome of its send attempt
    ///
    /// # Arguments
    /// * `job_id` - The ID of the job being acknowledged
    /// * `status` - The outcome of the send attempt
    async fn acknowledge(&self, job_id: &str, status: DispatchStatus) -> Result<()>;
}

/// HTTP implementation of JobQueue backed by the queue client
pub struct HttpJobQueue {
    client: QueueClient,
}

impl HttpJobQueue {
    /// Creates a new HTTP job queue repository
    pub fn new(client: QueueClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobQueue for HttpJobQueue {
    async fn fetch_next(&self) -> Result<Option<Job>> {
        self.client
            .fetch_next()
            .await
            .context("Failed to fetch next job from queue")
    }

    async fn acknowledge(&self, job_id: &str, status: DispatchStatus) -> Result<()> {
        self.client
            .acknowledge(job_id, status)
            .await
            .with_context(|| format!("Failed to acknowledge job {}", job_id))
    }
}
