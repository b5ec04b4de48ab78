// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP client for a remote video synthesis service

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::backend::{BackendError, VideoBackend};
use super::types::GenerationRequest;

#[derive(Debug, Deserialize)]
struct RemoteVideoResponse {
    #[serde(rename = "videoUrl", alias = "video_url", default)]
    video_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Backend that forwards generation requests to a synthesis service.
///
/// Concurrent jobs are bounded by a semaphore so a burst of requests
/// queues here instead of overloading the service.
pub struct HttpVideoBackend {
    client: Client,
    endpoint: String,
    jobs: Arc<Semaphore>,
}

impl HttpVideoBackend {
    pub fn new(
        endpoint: &str,
        timeout: Duration,
        max_concurrent_jobs: usize,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!(
            "Video backend configured: endpoint={}, timeout={}s, max_concurrent_jobs={}",
            endpoint,
            timeout.as_secs(),
            max_concurrent_jobs
        );

        Ok(Self {
            client,
            endpoint,
            jobs: Arc::new(Semaphore::new(max_concurrent_jobs.max(1))),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Jobs that could start right now without waiting
    pub fn available_slots(&self) -> usize {
        self.jobs.available_permits()
    }

    /// Check if the synthesis service is healthy
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.endpoint))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Video backend health check failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl VideoBackend for HttpVideoBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        let _permit = self
            .jobs
            .acquire()
            .await
            .map_err(|_| BackendError::Unavailable("job queue closed".to_string()))?;

        let url = format!("{}/v1/videos/generations", self.endpoint);
        debug!("Video backend POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout
                } else {
                    BackendError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Video backend returned {}: {}", status, text);
            return Err(if status.is_client_error() {
                BackendError::Rejected(format!("{}: {}", status, text))
            } else {
                BackendError::Failed(format!("{}: {}", status, text))
            });
        }

        let body: RemoteVideoResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout
            } else {
                BackendError::Failed(format!("invalid response body: {}", e))
            }
        })?;

        match body.video_url {
            Some(video_url) if !video_url.is_empty() => Ok(video_url),
            _ => Err(BackendError::Failed(
                body.error
                    .unwrap_or_else(|| "no video URL in response".to_string()),
            )),
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
