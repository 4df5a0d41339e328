//! Data Transfer Objects for the queue wire protocol
//!
//! This module contains the JSON shapes exchanged with the remote job
//! queue. DTOs are lightweight representations of domain entities
//! optimized for network transfer.

pub mod job;
