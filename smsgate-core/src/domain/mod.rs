//! Core domain types
//!
//! This module contains the domain structures shared across the gateway:
//! the job being dispatched and the observable state of the polling loop.

pub mod job;
pub mod poller;
