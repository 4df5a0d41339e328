//! Job DTOs for queue communication

use serde::{Deserialize, Serialize};

use crate::domain::job::{DispatchStatus, Job};

/// Envelope returned by `GET <queue-endpoint>`
///
/// `success=true` with a null or absent `data` field means the queue has
/// no pending job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchEnvelope {
    pub success: bool,

    #[serde(default)]
    pub data: Option<Job>,
}

/// Body of `POST <queue-endpoint>` acknowledging one job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckRequest {
    pub id: String,
    pub status: DispatchStatus,
}
