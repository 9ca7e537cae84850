use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use comicgen_pipeline::PipelineError;
use comicgen_replicate::ReplicateError;
use comicgen_story::StoryError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent `{ "error", "code" }`
/// JSON bodies. Upstream details are logged, never returned.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Comic creation failed somewhere in the pipeline.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A job status lookup failed.
    #[error(transparent)]
    Replicate(#[from] ReplicateError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- Comic creation ---
            AppError::Pipeline(PipelineError::Story(StoryError::EmptyPrompt)) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "Prompt is required".to_string(),
            ),
            AppError::Pipeline(err) => {
                tracing::error!(error = %err, "Comic generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GENERATION_FAILED",
                    "Failed to generate comic".to_string(),
                )
            }

            // --- Status lookups ---
            AppError::Replicate(ReplicateError::NotFound) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "Prediction ID is required".to_string(),
            ),
            AppError::Replicate(ReplicateError::Upstream { status, body }) => {
                tracing::warn!(status, body = %body, "Upstream status lookup failed");
                (
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                    "UPSTREAM_ERROR",
                    "Failed to fetch prediction status".to_string(),
                )
            }
            AppError::Replicate(err) => {
                tracing::error!(error = %err, "Status lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Failed to check prediction status".to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
