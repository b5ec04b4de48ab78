// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Controller talking to a live endpoint server over HTTP

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tutormotion::api::{create_app, AppState, GenerationEndpoint, JwtSessionVerifier};
use tutormotion::client::{
    ControllerSignal, GenerationController, GenerationTransport, HttpTransport, StaticSession,
    SubmitOutcome, WorkflowState,
};
use tutormotion::config::{ClientConfig, ServerConfig};
use tutormotion::generation::{GenerationRequest, GenerationResult, GenerationSettings};
use tutormotion::generation::{StubVideoBackend, STUB_VIDEO_URL};
use tutormotion::i18n::Locale;

use super::support::{screenshot, session_token, FixedDecoder, SECRET};

async fn spawn_server() -> SocketAddr {
    let endpoint = GenerationEndpoint::new(
        Arc::new(JwtSessionVerifier::new(SECRET)),
        Arc::new(StubVideoBackend::instant()),
    );
    let config = ServerConfig {
        session_secret: SECRET.to_string(),
        ..ServerConfig::default()
    };
    let app = create_app(AppState::new(endpoint, config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn http_controller(addr: SocketAddr, token: Option<String>, locale: Locale) -> GenerationController {
    let config = ClientConfig {
        server_url: format!("http://{}", addr),
        locale,
        ..ClientConfig::default()
    };
    let transport = HttpTransport::from_str_url(&config.server_url).unwrap();
    let session = match token {
        Some(token) => StaticSession::signed_in(token),
        None => StaticSession::signed_out(),
    };
    GenerationController::new(config, Arc::new(session), Arc::new(transport))
        .with_decoder(FixedDecoder::ok())
}

#[tokio::test]
async fn test_generation_over_http() {
    let addr = spawn_server().await;
    let mut controller = http_controller(addr, Some(session_token()), Locale::En);
    controller
        .select_image(screenshot("dashboard.png"), &CancellationToken::new())
        .await
        .unwrap();

    let outcome = controller.submit("click settings").await;

    assert_eq!(
        outcome,
        SubmitOutcome::Settled {
            state: WorkflowState::Succeeded {
                video_url: STUB_VIDEO_URL.to_string()
            },
            signal: None,
        }
    );
}

#[tokio::test]
async fn test_rejected_credential_over_http_signals_sign_in() {
    let addr = spawn_server().await;
    let mut controller = http_controller(addr, Some("stale-token".to_string()), Locale::Zh);
    controller
        .select_image(screenshot("dashboard.png"), &CancellationToken::new())
        .await
        .unwrap();

    let outcome = controller.submit("click settings").await;

    match outcome {
        SubmitOutcome::Settled {
            state: WorkflowState::Failed { message },
            signal: Some(ControllerSignal::SessionRequired { .. }),
        } => assert_eq!(message, "未授权"),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_transport_reports_validation_failure() {
    let addr = spawn_server().await;
    let transport = HttpTransport::from_str_url(&format!("http://{}", addr)).unwrap();
    let request = GenerationRequest::new("", "", &GenerationSettings::default());

    let result = transport
        .send(&request, &session_token(), Locale::En)
        .await
        .unwrap();

    assert_eq!(
        result,
        GenerationResult::ValidationFailed {
            message: "Prompt or Image is required".to_string()
        }
    );
}
