//! Status board service
//!
//! Holds the poller's last-known state and status line. The polling loop
//! writes transitions; an embedding layer (UI, health probe) reads
//! snapshots. This is the only shared mutable value in the gateway.

use chrono::Utc;
use smsgate_core::domain::poller::{PollerState, StatusSnapshot};
use std::sync::{Arc, Mutex};

/// Service for observing the polling loop
pub trait StatusService: Send + Sync {
    /// Records a state transition with its display message
    fn record(&self, state: PollerState, message: String);

    /// Returns the last-known state and status line
    fn snapshot(&self) -> StatusSnapshot;
}

/// In-memory implementation of StatusService
///
/// Uses Arc<Mutex<StatusSnapshot>> for thread-safe access across tasks.
#[derive(Clone)]
pub struct InMemoryStatusBoard {
    inner: Arc<Mutex<StatusSnapshot>>,
}

impl InMemoryStatusBoard {
    /// Creates a new status board in the Idle state
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StatusSnapshot {
                state: PollerState::Idle,
                message: "not started".to_string(),
                updated_at: Utc::now(),
            })),
        }
    }
}

impl Default for InMemoryStatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusService for InMemoryStatusBoard {
    fn record(&self, state: PollerState, message: String) {
        let mut inner = self.inner.lock().unwrap();
        *inner = StatusSnapshot {
            state,
            message,
            updated_at: Utc::now(),
        };
    }

    fn snapshot(&self) -> StatusSnapshot {
        self.inner.lock().unwrap().clone()
    }
}
