// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Video generation endpoint handler

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::api::auth::extract_credential;
use crate::api::http_server::AppState;
use crate::generation::GenerationResult;
use crate::i18n::{Locale, Translate};

/// Header selecting the locale of the response message
pub const LANGUAGE_HEADER: &str = "language";

/// POST /api/ai/text-to-video - Generate a tutorial video from a screenshot
///
/// The body is read raw so the caller is authenticated before the payload
/// is parsed. The HTTP status mirrors the envelope code.
pub async fn generate_video_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = Uuid::new_v4();
    let locale = headers
        .get(LANGUAGE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(Locale::from_tag)
        .unwrap_or_default();
    let credential = extract_credential(&headers);

    let span = info_span!("generate_video", %request_id, %locale);
    let outcome = state
        .endpoint
        .handle(credential.as_deref(), &body, locale)
        .instrument(span)
        .await;

    match outcome {
        Ok(video_url) => {
            info!("Generation request {} succeeded", request_id);
            respond(
                &GenerationResult::Success { video_url },
                state.endpoint.translator(),
                locale,
            )
        }
        Err(e) => {
            info!(
                "Generation request {} answered with code {}",
                request_id,
                e.code().as_u16()
            );
            e.into_response()
        }
    }
}

/// Serialize a result as the response envelope with its mirrored status
pub fn respond(result: &GenerationResult, translate: &dyn Translate, locale: Locale) -> Response {
    let status = StatusCode::from_u16(result.code().http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(result.to_response(translate, locale))).into_response()
}
