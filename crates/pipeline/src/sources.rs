//! Seams between the pipeline and the outside world.
//!
//! Production code plugs in [`StoryGenerator`] and [`ReplicateApi`]; tests
//! plug in scripted fakes.

use async_trait::async_trait;
use comicgen_core::job::{Job, JobHandle};
use comicgen_core::story::Story;
use comicgen_replicate::{ReplicateApi, ReplicateError};
use comicgen_story::{StoryError, StoryGenerator};

/// Boxed error returned by status sources, which may sit behind any
/// transport.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Produces a story from a user prompt.
#[async_trait]
pub trait StoryWriter: Send + Sync {
    async fn write_story(&self, user_prompt: &str) -> Result<Story, StoryError>;
}

/// Submits one image-generation job.
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    async fn submit_job(&self, generation_prompt: &str) -> Result<Job, ReplicateError>;
}

/// Looks up the current state of a job.
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    async fn job_status(&self, handle: &JobHandle) -> Result<Job, SourceError>;
}

#[async_trait]
impl StoryWriter for StoryGenerator {
    async fn write_story(&self, user_prompt: &str) -> Result<Story, StoryError> {
        self.generate_story(user_prompt).await
    }
}

#[async_trait]
impl JobSubmitter for ReplicateApi {
    async fn submit_job(&self, generation_prompt: &str) -> Result<Job, ReplicateError> {
        ReplicateApi::submit_job(self, generation_prompt).await
    }
}

#[async_trait]
impl JobStatusSource for ReplicateApi {
    async fn job_status(&self, handle: &JobHandle) -> Result<Job, SourceError> {
        Ok(self.get_job_status(handle.as_str()).await?)
    }
}
