//! Handlers for the `/jobs` resource.

use axum::extract::{Query, State};
use axum::Json;
use comicgen_replicate::ReplicateError;
use serde::Deserialize;

use crate::error::AppResult;
use crate::state::AppState;

/// Query parameters for `GET /jobs/status`.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub id: Option<String>,
}

/// GET /jobs/status?id=<handle>
///
/// Returns the upstream job record unchanged. A missing or empty `id` is a
/// 400; an upstream non-success status is passed through.
pub async fn get_job_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let handle = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or(ReplicateError::NotFound)?;

    let prediction = state.predictions.fetch_prediction(&handle).await?;

    tracing::debug!(
        job_id = %handle,
        status = prediction["status"].as_str().unwrap_or("unknown"),
        "Fetched job status",
    );

    Ok(Json(prediction))
}
