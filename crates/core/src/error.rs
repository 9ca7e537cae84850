#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A job handle was empty or otherwise unusable.
    #[error("Job handle not found: {0}")]
    NotFound(String),

    /// The upstream reported a job status outside the known vocabulary.
    #[error("Unknown job status: {0}")]
    UnknownStatus(String),

    /// An upstream job record was missing a required field.
    #[error("Malformed job record: {0}")]
    MalformedJob(String),

    /// A story and its job list did not line up one-to-one.
    #[error("Story has {panels} panels but {jobs} jobs were supplied")]
    Misaligned { panels: usize, jobs: usize },
}
