//! Route definitions for the `/comics` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::comics;
use crate::state::AppState;

/// Routes mounted at `/comics`.
///
/// ```text
/// POST   /                -> create_comic
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(comics::create_comic))
}
