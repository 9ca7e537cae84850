//! HTTP client for the comic generator API.

use async_trait::async_trait;
use comicgen_core::comic::{Comic, ComicEnvelope};
use comicgen_core::error::CoreError;
use comicgen_core::job::{Job, JobHandle};
use comicgen_pipeline::sources::{JobStatusSource, SourceError};
use serde::Deserialize;
use serde_json::json;

/// Errors from talking to the comic generator API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Malformed(String),
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Error body returned by the API: `{ "error": "...", "code": "..." }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for `POST /comics` and `GET /jobs/status`.
#[derive(Clone)]
pub struct ComicApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ComicApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client with a caller-supplied [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the API for a new comic. The returned panels carry their
    /// freshly submitted jobs.
    pub async fn create_comic(&self, prompt: &str) -> Result<Comic, ClientError> {
        let response = self
            .client
            .post(format!("{}/comics", self.base_url))
            .json(&json!({ "prompt": prompt }))
            .send()
            .await?;

        let response = error_for_status(response).await?;
        let envelope: ComicEnvelope = response
            .json()
            .await
            .map_err(|e| ClientError::Malformed(e.to_string()))?;

        let comic = Comic::try_from(envelope)?;
        tracing::info!(panels = comic.panels.len(), "Comic submitted");
        Ok(comic)
    }

    /// Fetch the current state of one job.
    pub async fn job_status(&self, handle: &JobHandle) -> Result<Job, ClientError> {
        let response = self
            .client
            .get(format!("{}/jobs/status", self.base_url))
            .query(&[("id", handle.as_str())])
            .send()
            .await?;

        let response = error_for_status(response).await?;
        let record: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ClientError::Malformed(e.to_string()))?;

        Ok(Job::from_prediction(&record)?)
    }
}

/// Turn a non-2xx response into [`ClientError::Api`], keeping the API's
/// error message when the body has one.
async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

/// [`JobStatusSource`] backed by the API's `GET /jobs/status` endpoint.
pub struct HttpStatusSource {
    api: ComicApiClient,
}

impl HttpStatusSource {
    pub fn new(api: ComicApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl JobStatusSource for HttpStatusSource {
    async fn job_status(&self, handle: &JobHandle) -> Result<Job, SourceError> {
        Ok(self.api.job_status(handle).await?)
    }
}
