//! REST API client for the Replicate prediction endpoints.
//!
//! Wraps job submission (`POST /v1/predictions`) and status lookup
//! (`GET /v1/predictions/{id}`) using [`reqwest`].

use comicgen_core::error::CoreError;
use comicgen_core::job::{Job, JobHandle};
use serde::Serialize;

use crate::config::ReplicateConfig;

/// Model version every job runs against.
pub const MODEL_VERSION: &str = "0501ddd5b8e85e344aa9447116fb81347b7f3ce86597055ba0794fb45db2e78c";

/// Model variant passed in the job input.
pub const MODEL_VARIANT: &str = "schnell";

/// Denoising steps per image.
pub const NUM_INFERENCE_STEPS: u32 = 4;

/// Classifier-free guidance scale.
pub const GUIDANCE_SCALE: f64 = 7.5;

/// HTTP client for the Replicate API.
pub struct ReplicateApi {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

/// Request body for `POST /v1/predictions`.
#[derive(Debug, Serialize)]
struct CreatePrediction<'a> {
    version: &'static str,
    input: PredictionInput<'a>,
}

#[derive(Debug, Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
    num_inference_steps: u32,
    guidance_scale: f64,
    model: &'static str,
}

/// Errors from the Replicate REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ReplicateError {
    /// No API token is configured.
    #[error("Replicate API token is not configured (set REPLICATE_API_TOKEN)")]
    MissingCredential,

    /// The job handle was empty or not a single path segment.
    #[error("Prediction ID is required")]
    NotFound,

    /// The configured base URL cannot carry a request path.
    #[error("Invalid Replicate base URL: {0}")]
    BaseUrl(String),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Job creation was rejected.
    #[error("Replicate rejected the job ({status}): {body}")]
    Submission {
        /// HTTP status code.
        status: u16,
        /// Raw response body, usually a JSON `{"detail": ...}` payload.
        body: String,
    },

    /// A status lookup returned a non-2xx status code.
    #[error("Replicate status lookup failed ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// The job reported a status outside the known vocabulary.
    #[error("Unknown job status: {0}")]
    UnknownStatus(String),

    /// The response body was not a usable prediction record.
    #[error("Malformed prediction record: {0}")]
    Malformed(String),
}

impl From<CoreError> for ReplicateError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownStatus(status) => Self::UnknownStatus(status),
            CoreError::NotFound(_) => Self::NotFound,
            other => Self::Malformed(other.to_string()),
        }
    }
}

impl ReplicateApi {
    /// Create a new API client from configuration.
    pub fn new(config: &ReplicateConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &ReplicateConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
        }
    }

    /// Submit one image-generation job for `generation_prompt`.
    ///
    /// Creates one billable remote job per successful call. The model
    /// parameters are fixed; only the prompt varies.
    pub async fn submit_job(&self, generation_prompt: &str) -> Result<Job, ReplicateError> {
        let token = self.token()?;

        let body = CreatePrediction {
            version: MODEL_VERSION,
            input: PredictionInput {
                prompt: generation_prompt,
                num_inference_steps: NUM_INFERENCE_STEPS,
                guidance_scale: GUIDANCE_SCALE,
                model: MODEL_VARIANT,
            },
        };

        let response = self
            .client
            .post(format!("{}/v1/predictions", self.base_url))
            .header(reqwest::header::AUTHORIZATION, format!("Token {token}"))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            tracing::warn!(status = status.as_u16(), body = %body, "Job submission rejected");
            return Err(ReplicateError::Submission {
                status: status.as_u16(),
                body,
            });
        }

        let record: serde_json::Value = response.json().await?;
        let job = Job::from_prediction(&record)?;

        tracing::info!(job_id = %job.id, status = %job.status, "Job submitted");
        Ok(job)
    }

    /// Fetch the raw prediction record for a job.
    ///
    /// Stateless and idempotent; safe to call repeatedly.
    pub async fn fetch_prediction(&self, handle: &str) -> Result<serde_json::Value, ReplicateError> {
        let handle = JobHandle::parse(handle)?;
        let token = self.token()?;

        let response = self
            .client
            .get(self.prediction_url(&handle)?)
            .header(reqwest::header::AUTHORIZATION, format!("Token {token}"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            tracing::debug!(job_id = %handle, status = status.as_u16(), "Status lookup failed");
            return Err(ReplicateError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Fetch a job's current status.
    pub async fn get_job_status(&self, handle: &str) -> Result<Job, ReplicateError> {
        let record = self.fetch_prediction(handle).await?;
        let job = Job::from_prediction(&record)?;
        tracing::debug!(job_id = %job.id, status = %job.status, "Fetched job status");
        Ok(job)
    }

    pub fn has_token(&self) -> bool {
        self.api_token.is_some()
    }

    // ---- private helpers ----

    /// `{base}/v1/predictions/{handle}` with the handle encoded as one segment.
    fn prediction_url(&self, handle: &JobHandle) -> Result<reqwest::Url, ReplicateError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ReplicateError::BaseUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| ReplicateError::BaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["v1", "predictions", handle.as_str()]);
        Ok(url)
    }

    fn token(&self) -> Result<&str, ReplicateError> {
        self.api_token
            .as_deref()
            .ok_or(ReplicateError::MissingCredential)
    }
}

/// Read an error response body, tolerating unreadable payloads.
async fn read_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string())
}
