// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Stateless core of the video generation endpoint

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::api::auth::{AuthError, SessionVerifier};
use crate::api::errors::ApiError;
use crate::generation::{GenerationRequest, GenerationResult, VideoBackend};
use crate::i18n::{self, Catalog, Locale, Translate};

/// Answers one generation request per call.
///
/// Pipeline:
/// 1. Authenticate the ambient session credential (401 on failure)
/// 2. Parse and validate the payload (400 on failure)
/// 3. Delegate to the video backend (500 on failure)
///
/// No state is kept between calls, so concurrent invocations need no locking.
pub struct GenerationEndpoint {
    verifier: Arc<dyn SessionVerifier>,
    backend: Arc<dyn VideoBackend>,
    translate: Arc<dyn Translate>,
}

impl GenerationEndpoint {
    pub fn new(verifier: Arc<dyn SessionVerifier>, backend: Arc<dyn VideoBackend>) -> Self {
        Self::with_translator(verifier, backend, Arc::new(Catalog))
    }

    pub fn with_translator(
        verifier: Arc<dyn SessionVerifier>,
        backend: Arc<dyn VideoBackend>,
        translate: Arc<dyn Translate>,
    ) -> Self {
        Self {
            verifier,
            backend,
            translate,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn translator(&self) -> &dyn Translate {
        self.translate.as_ref()
    }

    /// Handle a raw request body and return the video URL.
    ///
    /// The body is only parsed after the caller has been authenticated.
    pub async fn handle(
        &self,
        credential: Option<&str>,
        body: &[u8],
        locale: Locale,
    ) -> Result<String, ApiError> {
        self.authenticate(credential, locale)?;
        let request = serde_json::from_slice::<GenerationRequest>(body).map_err(|e| {
            warn!("Generation request body rejected: {}", e);
            ApiError::ValidationError(format!("Invalid request body: {}", e))
        })?;
        self.generate(&request, locale).await
    }

    /// Handle an already-parsed request
    pub async fn handle_request(
        &self,
        credential: Option<&str>,
        request: &GenerationRequest,
        locale: Locale,
    ) -> GenerationResult {
        let outcome = match self.authenticate(credential, locale) {
            Ok(()) => self.generate(request, locale).await,
            Err(e) => Err(e),
        };
        Self::into_result(outcome)
    }

    fn into_result(outcome: Result<String, ApiError>) -> GenerationResult {
        match outcome {
            Ok(video_url) => GenerationResult::Success { video_url },
            Err(e) => {
                debug!("Generation request answered with {}", e);
                e.into()
            }
        }
    }

    fn authenticate(&self, credential: Option<&str>, locale: Locale) -> Result<(), ApiError> {
        let unauthorized = || ApiError::Unauthorized(self.translate.lookup(locale, i18n::UNAUTHORIZED));

        let token = credential.ok_or_else(|| {
            debug!("Generation request without session credential");
            unauthorized()
        })?;

        match self.verifier.verify(token) {
            Ok(claims) => {
                debug!("Session verified for {}", claims.sub);
                Ok(())
            }
            Err(AuthError::Expired) => {
                info!("Generation request with expired session");
                Err(unauthorized())
            }
            Err(e) => {
                warn!("Generation request with bad session credential: {}", e);
                Err(unauthorized())
            }
        }
    }

    async fn generate(&self, request: &GenerationRequest, locale: Locale) -> Result<String, ApiError> {
        if let Err(e) = request.validate() {
            warn!("Generation request validation failed: {}", e);
            return Err(ApiError::ValidationError(
                self.translate.lookup(locale, i18n::PROMPT_OR_IMAGE_REQUIRED),
            ));
        }

        info!(
            "Starting video generation: backend={}, prompt_len={}, image_name={:?}",
            self.backend.name(),
            request.prompt.len(),
            request.image_name
        );

        // A panicking backend still yields a structured 500
        let outcome = AssertUnwindSafe(self.backend.generate(request))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(video_url)) => {
                info!("Video generated: {}", video_url);
                Ok(video_url)
            }
            Ok(Err(e)) => {
                error!("Video generation error: {}", e);
                let message = e.to_string();
                Err(ApiError::InternalError(if message.is_empty() {
                    self.translate.lookup(locale, i18n::INTERNAL_ERROR)
                } else {
                    message
                }))
            }
            Err(_) => {
                error!("Video backend panicked");
                Err(ApiError::InternalError(
                    self.translate.lookup(locale, i18n::INTERNAL_ERROR),
                ))
            }
        }
    }
}
