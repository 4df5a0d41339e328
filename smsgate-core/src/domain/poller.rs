//! Poller state domain model
//!
//! Represents the observable lifecycle of the polling loop. The state is
//! transient and in-memory only; it resets on process restart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of the polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PollerState {
    /// No job pending at the last check
    Idle,

    /// Asking the queue for the next job
    Checking,

    /// Handing a job to the send capability
    Sending,

    /// Reporting the send attempt back to the queue
    Acknowledging,

    /// The last cycle failed; the loop keeps running
    Error,
}

impl std::fmt::Display for PollerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollerState::Idle => write!(f, "Idle"),
            PollerState::Checking => write!(f, "Checking"),
            PollerState::Sending => write!(f, "Sending"),
            PollerState::Acknowledging => write!(f, "Acknowledging"),
            PollerState::Error => write!(f, "Error"),
        }
    }
}

/// Read-only view of the poller for an embedding UI
///
/// The message carries human-readable detail for display: "no pending
/// job", the last dispatched number, or the last error text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// State at the time of the snapshot
    pub state: PollerState,

    /// Last-known status line
    pub message: String,

    /// When the status last changed
    pub updated_at: DateTime<Utc>,
}
