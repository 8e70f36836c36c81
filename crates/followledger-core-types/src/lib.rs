//! Core types shared across FollowLedger facilities
//!
//! This crate provides foundational types used by the logging facility and
//! the command-line front end:
//!
//! - **Correlation types**: RunId, stamped on every event of one pipeline run
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RunId;
