//! Handlers for the `/comics` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use comicgen_core::comic::ComicEnvelope;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /comics`.
#[derive(Debug, Deserialize)]
pub struct CreateComicRequest {
    pub prompt: String,
}

/// POST /comics
///
/// Writes a three-panel story for the prompt and submits one image job per
/// panel. Responds with `{ "story": ..., "predictions": [...] }` where
/// `predictions[i]` illustrates `story.comics[i]`. Any failure, including a
/// single rejected panel, fails the whole request.
pub async fn create_comic(
    State(state): State<AppState>,
    body: Result<Json<CreateComicRequest>, JsonRejection>,
) -> AppResult<Json<ComicEnvelope>> {
    let Json(input) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    if input.prompt.trim().is_empty() {
        return Err(AppError::BadRequest("Prompt is required".into()));
    }

    let comic = state.orchestrator.create_comic(&input.prompt).await?;

    tracing::info!(
        panels = comic.panels.len(),
        job_ids = ?comic.jobs().map(|j| j.id.as_str()).collect::<Vec<_>>(),
        "Comic created",
    );

    Ok(Json(comic.into_envelope()))
}
