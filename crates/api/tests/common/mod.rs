#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use comicgen_api::config::ServerConfig;
use comicgen_api::router::build_app_router;
use comicgen_api::state::{AppState, PredictionLookup};
use comicgen_core::job::Job;
use comicgen_core::story::{Story, StoryPanel};
use comicgen_pipeline::sources::{JobSubmitter, StoryWriter};
use comicgen_pipeline::ComicOrchestrator;
use comicgen_replicate::{ReplicateConfig, ReplicateError};
use comicgen_story::{StoryConfig, StoryError};

/// Build a test `ServerConfig` with safe defaults and both credentials set.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        story: StoryConfig {
            base_url: "http://story.invalid".to_string(),
            model: "gpt-4o".to_string(),
            api_key: Some("test-key".to_string()),
        },
        replicate: ReplicateConfig {
            base_url: "http://replicate.invalid".to_string(),
            api_token: Some("test-token".to_string()),
        },
    }
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Writes a fixed three-panel story. Prompts containing "fail" are rejected.
pub struct FakeStory;

#[async_trait]
impl StoryWriter for FakeStory {
    async fn write_story(&self, user_prompt: &str) -> Result<Story, StoryError> {
        if user_prompt.contains("fail") {
            return Err(StoryError::MalformedResponse("not json".into()));
        }
        Ok(Story {
            comics: (1..=3)
                .map(|i| StoryPanel {
                    generation_prompt: format!(
                        "YuRi_cat, white and orange tabby, scene {i}, cute cartoon style, vivid colors"
                    ),
                    caption: format!("Yuri in scene {i}."),
                })
                .collect(),
        })
    }
}

/// Issues `pred-<n>` handles. Rejects prompts mentioning scene 2 when
/// `reject_second` is set.
#[derive(Default)]
pub struct FakeSubmitter {
    pub reject_second: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl JobSubmitter for FakeSubmitter {
    async fn submit_job(&self, generation_prompt: &str) -> Result<Job, ReplicateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_second && generation_prompt.contains("scene 2") {
            return Err(ReplicateError::Submission {
                status: 422,
                body: r#"{"detail":"Invalid input"}"#.into(),
            });
        }
        let n = generation_prompt
            .split("scene ")
            .nth(1)
            .and_then(|rest| rest.split(',').next())
            .unwrap_or("0");
        Ok(Job::from_prediction(&json!({
            "id": format!("pred-{n}"),
            "status": "starting",
            "output": null,
            "created_at": "2024-10-01T12:00:00Z",
        }))
        .unwrap())
    }
}

/// Answers status lookups by handle:
/// - `pred-ok` → a succeeded record
/// - `gone` → upstream 404
/// - `down` → transport-level failure
pub struct FakeLookup;

#[async_trait]
impl PredictionLookup for FakeLookup {
    async fn fetch_prediction(&self, handle: &str) -> Result<Value, ReplicateError> {
        match handle {
            "" => Err(ReplicateError::NotFound),
            "gone" => Err(ReplicateError::Upstream {
                status: 404,
                body: r#"{"detail":"Not found."}"#.into(),
            }),
            "down" => Err(ReplicateError::Malformed("connection closed".into())),
            id => Ok(json!({
                "id": id,
                "status": "succeeded",
                "output": [format!("https://replicate.delivery/{id}.webp")],
                "metrics": { "predict_time": 1.2 },
            })),
        }
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Build the full application router with all middleware layers, backed by
/// the given fakes.
pub fn build_app_with(config: ServerConfig, submitter: Arc<FakeSubmitter>) -> Router {
    let state = AppState {
        orchestrator: ComicOrchestrator::new(Arc::new(FakeStory), submitter),
        predictions: Arc::new(FakeLookup),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config).unwrap()
}

pub fn build_test_app() -> Router {
    build_app_with(test_config(), Arc::new(FakeSubmitter::default()))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    post_raw(app, uri, &body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
