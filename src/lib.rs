//! Conformance suite for a `/api/jobs` REST service.
//!
//! [`suite::Suite`] drives a [`client::JobsClient`] through the create, read,
//! update and delete contract of the service and reports every case;
//! [`stub`] serves an in-memory implementation of the same contract.

pub mod client;
pub mod config;
pub mod fixtures;
pub mod logging;
pub mod models;
pub mod shutdown;
pub mod stub;
pub mod suite;
