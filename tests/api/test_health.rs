// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tests for GET /health

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use std::sync::Arc;
use tower::util::ServiceExt;
use tutormotion::api::{create_app, AppState, GenerationEndpoint, JwtSessionVerifier};
use tutormotion::config::ServerConfig;
use tutormotion::generation::StubVideoBackend;

#[tokio::test]
async fn test_health_reports_backend_and_version() {
    let endpoint = GenerationEndpoint::new(
        Arc::new(JwtSessionVerifier::new("health-secret-0123456789")),
        Arc::new(StubVideoBackend::instant()),
    );
    let app = create_app(AppState::new(endpoint, ServerConfig::default()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["backend"], "stub");
    assert_eq!(json["version"], tutormotion::version::VERSION_NUMBER);
    assert_eq!(json["build"], tutormotion::version::VERSION);
    assert!(json["features"]
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f == "screenshot-to-video"));
}
