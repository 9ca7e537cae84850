//! Integration tests for [`ReplicateApi`] against an in-process fake of the
//! Replicate predictions API.

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use comicgen_core::job::JobStatus;
use comicgen_replicate::api::{GUIDANCE_SCALE, MODEL_VERSION, NUM_INFERENCE_STEPS};
use comicgen_replicate::{ReplicateApi, ReplicateConfig, ReplicateError};
use serde_json::{json, Value};

const TOKEN: &str = "r8_test_token";

/// Requests seen by the fake upstream.
#[derive(Clone, Default)]
struct Recorded {
    submissions: Arc<Mutex<Vec<Value>>>,
    auth_headers: Arc<Mutex<Vec<String>>>,
    status_calls: Arc<Mutex<usize>>,
    other_paths: Arc<Mutex<Vec<String>>>,
}

async fn unrouted(State(rec): State<Recorded>, uri: axum::http::Uri) -> StatusCode {
    rec.other_paths.lock().unwrap().push(uri.to_string());
    StatusCode::NOT_FOUND
}

async fn create_prediction(
    State(rec): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    rec.auth_headers.lock().unwrap().push(auth);

    let prompt = body["input"]["prompt"].as_str().unwrap_or_default().to_string();
    let n = {
        let mut subs = rec.submissions.lock().unwrap();
        subs.push(body);
        subs.len()
    };

    if prompt.contains("reject") {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": "Invalid prompt" })),
        );
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "id": format!("pred-{n}"),
            "status": "starting",
            "output": null,
            "error": null,
            "created_at": "2024-11-02T10:00:00.000Z",
        })),
    )
}

async fn get_prediction(
    State(rec): State<Recorded>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    *rec.status_calls.lock().unwrap() += 1;

    match id.as_str() {
        "done" => (
            StatusCode::OK,
            Json(json!({
                "id": "done",
                "status": "succeeded",
                "output": ["https://replicate.delivery/done.webp"],
                "error": null,
            })),
        ),
        "weird" => (
            StatusCode::OK,
            Json(json!({ "id": "weird", "status": "paused" })),
        ),
        "boom" => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "detail": "try later" })),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Not found." })),
        ),
    }
}

/// Start the fake upstream on an ephemeral port and return its base URL.
async fn spawn_upstream() -> (String, Recorded) {
    let rec = Recorded::default();
    let app = Router::new()
        .route("/v1/predictions", post(create_prediction))
        .route("/v1/predictions/{id}", get(get_prediction))
        .fallback(unrouted)
        .with_state(rec.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), rec)
}

fn client(base_url: &str, token: Option<&str>) -> ReplicateApi {
    ReplicateApi::new(&ReplicateConfig {
        base_url: base_url.to_string(),
        api_token: token.map(str::to_string),
    })
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_sends_fixed_parameters_and_token() {
    let (base, rec) = spawn_upstream().await;
    let api = client(&base, Some(TOKEN));

    let job = api.submit_job("YuRi_cat on a boat").await.unwrap();

    assert_eq!(job.id.as_str(), "pred-1");
    assert_eq!(job.status, JobStatus::Queued);
    assert!(job.output.is_empty());

    let subs = rec.submissions.lock().unwrap();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0]["version"], MODEL_VERSION);
    assert_eq!(subs[0]["input"]["prompt"], "YuRi_cat on a boat");
    assert_eq!(subs[0]["input"]["num_inference_steps"], NUM_INFERENCE_STEPS);
    assert_eq!(subs[0]["input"]["guidance_scale"], GUIDANCE_SCALE);
    assert_eq!(subs[0]["input"]["model"], "schnell");

    assert_eq!(
        rec.auth_headers.lock().unwrap()[0],
        format!("Token {TOKEN}")
    );
}

#[tokio::test]
async fn submit_without_token_makes_no_request() {
    let (base, rec) = spawn_upstream().await;
    let api = client(&base, None);

    let result = api.submit_job("anything").await;

    assert_matches!(result, Err(ReplicateError::MissingCredential));
    assert!(rec.submissions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn rejected_submission_carries_upstream_payload() {
    let (base, _rec) = spawn_upstream().await;
    let api = client(&base, Some(TOKEN));

    let result = api.submit_job("please reject me").await;

    assert_matches!(
        result,
        Err(ReplicateError::Submission { status: 422, ref body }) if body.contains("Invalid prompt")
    );
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_handle_is_rejected_before_any_request() {
    let (base, rec) = spawn_upstream().await;
    let api = client(&base, Some(TOKEN));

    assert_matches!(api.get_job_status("").await, Err(ReplicateError::NotFound));
    assert_matches!(api.fetch_prediction("  ").await, Err(ReplicateError::NotFound));
    assert_eq!(*rec.status_calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn path_like_handles_never_reach_the_network() {
    let (base, rec) = spawn_upstream().await;
    let api = client(&base, Some(TOKEN));

    for handle in ["../account", "abc?x=1", "abc#top", "a/b", ".."] {
        assert_matches!(
            api.fetch_prediction(handle).await,
            Err(ReplicateError::NotFound),
            "handle {handle:?}"
        );
    }
    assert_eq!(*rec.status_calls.lock().unwrap(), 0);
    assert!(rec.other_paths.lock().unwrap().is_empty());
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
    let (base, rec) = spawn_upstream().await;
    let api = client(&format!("{base}/"), Some(TOKEN));

    let job = api.get_job_status("done").await.unwrap();

    assert_eq!(job.status, JobStatus::Succeeded);
    assert_eq!(*rec.status_calls.lock().unwrap(), 1);
    assert!(rec.other_paths.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unusable_base_url_is_reported() {
    let api = client("not a url", Some(TOKEN));

    assert_matches!(
        api.fetch_prediction("done").await,
        Err(ReplicateError::BaseUrl(_))
    );
}

#[tokio::test]
async fn terminal_status_is_idempotent() {
    let (base, rec) = spawn_upstream().await;
    let api = client(&base, Some(TOKEN));

    let first = api.get_job_status("done").await.unwrap();
    let second = api.get_job_status("done").await.unwrap();
    let third = api.get_job_status("done").await.unwrap();

    assert_eq!(first.status, JobStatus::Succeeded);
    assert_eq!(first.image_url(), Some("https://replicate.delivery/done.webp"));
    assert_eq!(first, second);
    assert_eq!(second, third);
    assert_eq!(*rec.status_calls.lock().unwrap(), 3);
}

#[tokio::test]
async fn unknown_upstream_status_is_surfaced() {
    let (base, _rec) = spawn_upstream().await;
    let api = client(&base, Some(TOKEN));

    assert_matches!(
        api.get_job_status("weird").await,
        Err(ReplicateError::UnknownStatus(s)) if s == "paused"
    );
}

#[tokio::test]
async fn non_success_status_lookup_is_upstream_error() {
    let (base, _rec) = spawn_upstream().await;
    let api = client(&base, Some(TOKEN));

    assert_matches!(
        api.get_job_status("missing").await,
        Err(ReplicateError::Upstream { status: 404, .. })
    );
    assert_matches!(
        api.fetch_prediction("boom").await,
        Err(ReplicateError::Upstream { status: 503, .. })
    );
}

#[tokio::test]
async fn raw_prediction_is_returned_untouched() {
    let (base, _rec) = spawn_upstream().await;
    let api = client(&base, Some(TOKEN));

    let raw = api.fetch_prediction("done").await.unwrap();
    assert_eq!(raw["output"][0], "https://replicate.delivery/done.webp");
    assert!(raw["error"].is_null());
}
