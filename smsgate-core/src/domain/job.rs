//! Job domain types

use serde::{Deserialize, Serialize};

/// One pending outbound text message.
///
/// Produced by the queue server and immutable once fetched. A poller holds
/// at most one job at a time, in the window between fetch and
/// acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Opaque identifier assigned by the queue
    pub id: String,

    /// Destination phone number
    pub phone: String,

    /// Message body to transmit
    pub message: String,
}

/// Outcome of a send attempt, reported back to the queue per job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStatus {
    /// The message was handed to the send capability
    Sent,

    /// The send capability could not take the message
    Failed,
}

impl std::fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchStatus::Sent => write!(f, "sent"),
            DispatchStatus::Failed => write!(f, "failed"),
        }
    }
}
