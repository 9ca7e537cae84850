pub mod comics;
pub mod health;
pub mod jobs;

use axum::Router;

use crate::state::AppState;

/// Build the route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                 service health (GET)
/// /comics                 create a comic from a prompt (POST)
/// /jobs/status?id=        raw status of one image job (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/comics", comics::router())
        .nest("/jobs", jobs::router())
}
