//! Repository layer
//!
//! Repositories abstract communication with the remote job queue. They
//! provide a focused interface for the two wire operations without any
//! business logic.
//!
//! All repositories are trait-based to enable testing and mocking.

mod jobs;

// Re-export traits
pub use jobs::JobQueue;

// Re-export implementations
pub use jobs::HttpJobQueue;
