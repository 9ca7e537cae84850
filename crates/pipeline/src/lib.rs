//! Comic pipeline: story generation, job fan-out and status polling.
//!
//! - [`orchestrator::ComicOrchestrator`] turns a prompt into a [`Comic`]
//!   whose panels each carry a submitted job.
//! - [`poller::PollingController`] drives the jobs of a comic to a terminal
//!   state, revealing panel images as they complete.
//!
//! Both talk to the outside world through the traits in [`sources`].
//!
//! [`Comic`]: comicgen_core::comic::Comic

pub mod error;
pub mod orchestrator;
pub mod poller;
pub mod sources;

pub use error::PipelineError;
pub use orchestrator::ComicOrchestrator;
pub use poller::{PollConfig, PollEvent, PollOutcome, PollReport, PollingController};
