//! REST client for the Replicate predictions API.
//!
//! Submits image-generation jobs and fetches their status. Each call maps
//! to exactly one outbound HTTP request; retrying is left to callers.

pub mod api;
pub mod config;

pub use api::{ReplicateApi, ReplicateError};
pub use config::ReplicateConfig;
