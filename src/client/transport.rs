// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Outbound call from the controller to the generation endpoint

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use std::sync::Arc;
use tracing::debug;

use crate::api::generate_video::LANGUAGE_HEADER;
use crate::api::http_server::GENERATE_ROUTE;
use crate::generation::{GenerationRequest, GenerationResponse, GenerationResult};
use crate::i18n::{Catalog, Locale, Translate};

/// Transport failures. Always recoverable at the UI level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request timed out")]
    Timeout,
}

/// Sends one generation request and interprets the answer
#[async_trait]
pub trait GenerationTransport: Send + Sync {
    async fn send(
        &self,
        request: &GenerationRequest,
        credential: &str,
        locale: Locale,
    ) -> Result<GenerationResult, TransportError>;
}

/// reqwest-based transport to a running endpoint server
pub struct HttpTransport {
    base_url: Url,
    client: Client,
    translate: Arc<dyn Translate>,
}

impl HttpTransport {
    pub fn new(mut base_url: Url) -> Self {
        // A base without a trailing slash would lose its last segment on join
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            client: Client::new(),
            translate: Arc::new(Catalog),
        }
    }

    pub fn from_str_url(base_url: &str) -> Result<Self, TransportError> {
        let url = Url::parse(base_url)
            .map_err(|e| TransportError::Network(format!("Invalid URL: {e}")))?;
        Ok(Self::new(url))
    }

    /// Generation route resolved against the base URL
    pub fn generate_url(&self) -> Result<Url, TransportError> {
        self.base_url
            .join(GENERATE_ROUTE.trim_start_matches('/'))
            .map_err(|e| TransportError::Network(format!("Invalid URL: {e}")))
    }
}

#[async_trait]
impl GenerationTransport for HttpTransport {
    async fn send(
        &self,
        request: &GenerationRequest,
        credential: &str,
        locale: Locale,
    ) -> Result<GenerationResult, TransportError> {
        let url = self.generate_url()?;
        debug!("Generation POST {}", url);

        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(LANGUAGE_HEADER, locale.as_tag())
            .bearer_auth(credential)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let envelope: GenerationResponse = serde_json::from_str(&text).map_err(|e| {
            TransportError::MalformedResponse(format!("status {}: {}", status, e))
        })?;

        Ok(envelope.interpret(status, self.translate.as_ref(), locale))
    }
}
