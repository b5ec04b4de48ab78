// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tests for POST /api/ai/text-to-video

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::util::ServiceExt;
use tutormotion::api::{create_app, AppState, GenerationEndpoint, JwtSessionVerifier};
use tutormotion::config::ServerConfig;
use tutormotion::generation::{
    BackendError, GenerationRequest, StubVideoBackend, VideoBackend, STUB_VIDEO_URL,
};

const SECRET: &str = "route-test-secret-0123456789";

/// Backend that counts calls and fails on demand
struct CountingBackend {
    calls: AtomicUsize,
    fail_with: Option<BackendError>,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl CountingBackend {
    fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail_with: None,
            last_request: Mutex::new(None),
        })
    }

    fn failing(err: BackendError) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail_with: Some(err),
            last_request: Mutex::new(None),
        })
    }
}

#[async_trait]
impl VideoBackend for CountingBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok("https://cdn.example/tutorial.mp4".to_string()),
        }
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

fn config() -> ServerConfig {
    ServerConfig {
        session_secret: SECRET.to_string(),
        ..ServerConfig::default()
    }
}

fn app_with(backend: Arc<dyn VideoBackend>) -> Router {
    let verifier = Arc::new(JwtSessionVerifier::new(SECRET));
    create_app(AppState::new(
        GenerationEndpoint::new(verifier, backend),
        config(),
    ))
}

fn stub_app() -> Router {
    app_with(Arc::new(StubVideoBackend::instant()))
}

fn token() -> String {
    JwtSessionVerifier::new(SECRET)
        .issue("user-42", Duration::from_secs(600))
        .unwrap()
}

fn post() -> axum::http::request::Builder {
    Request::builder()
        .method(Method::POST)
        .uri("/api/ai/text-to-video")
        .header(header::CONTENT_TYPE, "application/json")
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

const VALID_BODY: &str = r#"{
    "prompt": "click settings",
    "image_name": "dashboard.png",
    "duration": "5",
    "aspectRatio": "16:9",
    "motion_bucket_id": "127"
}"#;

#[tokio::test]
async fn test_success_returns_code_1000_and_video_url() {
    let request = post()
        .header(header::AUTHORIZATION, format!("Bearer {}", token()))
        .body(Body::from(VALID_BODY))
        .unwrap();

    let response = stub_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = read_json(response).await;
    assert_eq!(json["code"], 1000);
    assert_eq!(json["message"], "Video generation successful");
    assert_eq!(json["data"]["videoUrl"], STUB_VIDEO_URL);
}

#[tokio::test]
async fn test_missing_session_returns_401() {
    let request = post().body(Body::from(VALID_BODY)).unwrap();

    let response = stub_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = read_json(response).await;
    assert_eq!(json["code"], 401);
    assert_eq!(json["message"], "Unauthorized");
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn test_expired_session_returns_401() {
    let expired = JwtSessionVerifier::new(SECRET)
        .issue_with_expiry("user-42", chrono::Utc::now().timestamp() - 30)
        .unwrap();
    let request = post()
        .header(header::AUTHORIZATION, format!("Bearer {}", expired))
        .body(Body::from(VALID_BODY))
        .unwrap();

    let response = stub_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_cookie_is_accepted() {
    let request = post()
        .header(header::COOKIE, format!("session_token={}", token()))
        .body(Body::from(VALID_BODY))
        .unwrap();

    let response = stub_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_empty_prompt_and_image_returns_400_without_backend_call() {
    let backend = CountingBackend::succeeding();
    let body = r#"{"prompt": "", "image_name": ""}"#;
    let request = post()
        .header(header::AUTHORIZATION, format!("Bearer {}", token()))
        .body(Body::from(body))
        .unwrap();

    let response = app_with(backend.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = read_json(response).await;
    assert_eq!(json["code"], 400);
    assert_eq!(json["message"], "Prompt or Image is required");
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_auth_checked_before_payload() {
    let backend = CountingBackend::succeeding();
    let request = post()
        .header(header::AUTHORIZATION, "Bearer forged")
        .body(Body::from("this is not json"))
        .unwrap();

    let response = app_with(backend.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_image_only_request_is_accepted() {
    let backend = CountingBackend::succeeding();
    let body = r#"{"prompt": "", "image_name": "dashboard.png"}"#;
    let request = post()
        .header(header::AUTHORIZATION, format!("Bearer {}", token()))
        .body(Body::from(body))
        .unwrap();

    let response = app_with(backend.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_null_prompt_with_image_is_accepted() {
    let backend = CountingBackend::succeeding();
    let body = r#"{"prompt": null, "image_name": "a.png", "duration": "5", "aspectRatio": "16:9", "motion_bucket_id": "127"}"#;
    let request = post()
        .header(header::AUTHORIZATION, format!("Bearer {}", token()))
        .body(Body::from(body))
        .unwrap();

    let response = app_with(backend.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["code"], 1000);

    let forwarded = backend.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(forwarded.prompt, "");
    assert_eq!(forwarded.image_name, "a.png");
}

#[tokio::test]
async fn test_numeric_settings_are_passed_through() {
    let backend = CountingBackend::succeeding();
    let body = r#"{"prompt": "wave", "image_name": "a.png", "duration": 5, "aspectRatio": "16:9", "motion_bucket_id": 127}"#;
    let request = post()
        .header(header::AUTHORIZATION, format!("Bearer {}", token()))
        .body(Body::from(body))
        .unwrap();

    let response = app_with(backend.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let forwarded = backend.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(forwarded.duration, "5");
    assert_eq!(forwarded.aspect_ratio, "16:9");
    assert_eq!(forwarded.motion_bucket_id, "127");
}

#[tokio::test]
async fn test_backend_failure_returns_500() {
    let backend = CountingBackend::failing(BackendError::Failed("synthesis crashed".to_string()));
    let request = post()
        .header(header::AUTHORIZATION, format!("Bearer {}", token()))
        .body(Body::from(VALID_BODY))
        .unwrap();

    let response = app_with(backend.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = read_json(response).await;
    assert_eq!(json["code"], 500);
    assert_eq!(json["message"], "Video generation failed: synthesis crashed");
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_language_header_localizes_message_only() {
    let request = post()
        .header("language", "zh-CN")
        .body(Body::from(VALID_BODY))
        .unwrap();

    let response = stub_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = read_json(response).await;
    assert_eq!(json["code"], 401);
    assert_eq!(json["message"], "未授权");
}

#[tokio::test]
async fn test_malformed_body_returns_400() {
    let request = post()
        .header(header::AUTHORIZATION, format!("Bearer {}", token()))
        .body(Body::from("{\"prompt\": "))
        .unwrap();

    let response = stub_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["code"], 400);
}

#[tokio::test]
async fn test_get_is_not_allowed() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/ai/text-to-video")
        .body(Body::empty())
        .unwrap();

    let response = stub_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
