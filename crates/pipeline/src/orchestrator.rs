//! Prompt to submitted comic.
//!
//! Generates the story first; only once it exists are the per-panel jobs
//! submitted, concurrently. A failed story therefore never leaves orphaned
//! remote jobs behind.

use std::sync::Arc;

use comicgen_core::comic::Comic;
use futures::future::join_all;

use crate::error::PipelineError;
use crate::sources::{JobSubmitter, StoryWriter};

/// Creates comics from user prompts.
///
/// Cheap to clone into request handlers.
#[derive(Clone)]
pub struct ComicOrchestrator {
    story: Arc<dyn StoryWriter>,
    jobs: Arc<dyn JobSubmitter>,
}

impl ComicOrchestrator {
    pub fn new(story: Arc<dyn StoryWriter>, jobs: Arc<dyn JobSubmitter>) -> Self {
        Self { story, jobs }
    }

    /// Generate a story for `user_prompt` and submit one job per panel.
    ///
    /// Submissions run concurrently and the call waits for every one of them
    /// to settle, so no request is abandoned mid-flight. If any submission
    /// fails the whole call fails with the error of the lowest failing
    /// panel, even though the story itself succeeded and the other panels'
    /// jobs may already exist upstream. Partial comics are never returned.
    pub async fn create_comic(&self, user_prompt: &str) -> Result<Comic, PipelineError> {
        let story = self.story.write_story(user_prompt).await?;

        tracing::info!(panels = story.len(), "Submitting panel jobs");

        let submissions = story
            .comics
            .iter()
            .enumerate()
            .map(|(panel_index, panel)| async move {
                self.jobs
                    .submit_job(&panel.generation_prompt)
                    .await
                    .map_err(|source| {
                        tracing::error!(panel_index, error = %source, "Panel job submission failed");
                        PipelineError::Submission {
                            panel_index,
                            source,
                        }
                    })
            });

        let jobs = join_all(submissions)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        let comic = Comic::from_parts(story, jobs)?;
        for (panel_index, pair) in comic.panels.iter().enumerate() {
            tracing::debug!(panel_index, job_id = %pair.job.id, "Panel paired with job");
        }

        Ok(comic)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
