//! Smsgate Core
//!
//! Core types and abstractions for the smsgate SMS gateway.
//!
//! This crate contains:
//! - Domain types: Core business entities (Job, DispatchStatus, PollerState)
//! - DTOs: Wire shapes exchanged with the remote job queue

pub mod domain;
pub mod dto;
