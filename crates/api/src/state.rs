use std::sync::Arc;

use async_trait::async_trait;
use comicgen_pipeline::ComicOrchestrator;
use comicgen_replicate::{ReplicateApi, ReplicateError};

use crate::config::ServerConfig;

/// Raw job lookup backing `GET /jobs/status`.
///
/// Returns the upstream record untouched so callers see every field the
/// image service reports.
#[async_trait]
pub trait PredictionLookup: Send + Sync {
    async fn fetch_prediction(&self, handle: &str) -> Result<serde_json::Value, ReplicateError>;
}

#[async_trait]
impl PredictionLookup for ReplicateApi {
    async fn fetch_prediction(&self, handle: &str) -> Result<serde_json::Value, ReplicateError> {
        ReplicateApi::fetch_prediction(self, handle).await
    }
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration, including which upstream credentials are present.
    pub config: Arc<ServerConfig>,
    /// Story generation and job fan-out.
    pub orchestrator: ComicOrchestrator,
    /// Job status lookups.
    pub predictions: Arc<dyn PredictionLookup>,
}
