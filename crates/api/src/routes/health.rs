use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether a story credential is configured.
    pub story_configured: bool,
    /// Whether an image job credential is configured.
    pub jobs_configured: bool,
}

/// GET /health -- reports whether both upstream credentials are present.
///
/// Does not call the upstream services.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let story_configured = state.config.story.has_key();
    let jobs_configured = state.config.replicate.has_token();

    let status = if story_configured && jobs_configured {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        story_configured,
        jobs_configured,
    })
}

/// Mount health check routes at the root.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
