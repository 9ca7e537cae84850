use comicgen_core::error::CoreError;
use comicgen_replicate::ReplicateError;
use comicgen_story::StoryError;

/// Errors from [`ComicOrchestrator::create_comic`](crate::ComicOrchestrator::create_comic).
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The story could not be generated. No jobs were submitted.
    #[error("Story generation failed: {0}")]
    Story(#[from] StoryError),

    /// A panel's job submission failed, which fails the whole comic.
    #[error("Job submission failed for panel {panel_index}: {source}")]
    Submission {
        panel_index: usize,
        source: ReplicateError,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}
