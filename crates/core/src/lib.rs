//! Domain logic for the form-approval workflow.
//!
//! This crate has no database or I/O dependencies so it can be used by the
//! persistence layer, the application service, and any future CLI tooling.

pub mod audit;
pub mod error;
pub mod role;
pub mod status;
pub mod types;
pub mod workflow;
