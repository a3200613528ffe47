//! Marketplace workflows: catalog browsing, campaign authoring, application
//! submission and review, and the per-role dashboard.
//!
//! Every operation takes the acting identity and, where it writes a
//! timestamp, the current time explicitly.

pub mod access;
pub mod authoring;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod profiles;
pub mod review;
pub mod submission;

#[cfg(test)]
mod testing;

pub use error::{Result, WorkflowError};
