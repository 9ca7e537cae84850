//! Command-line client for the comic generator API.
//!
//! Submits a prompt to `POST /comics`, then polls `GET /jobs/status` for
//! each panel's image and prints panels as their images become available.

pub mod api;
pub mod cli;
pub mod render;

pub use api::{ClientError, ComicApiClient, HttpStatusSource};
