//! Scheduler layer for the gateway
//!
//! This layer drives the fixed-interval poll loop: fetch the next
//! pending job from the queue, hand it to the send capability, and
//! acknowledge the attempt. It owns the lifecycle of the polling task.

pub mod poller;

pub use poller::JobPoller;
