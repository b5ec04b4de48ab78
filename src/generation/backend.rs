// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Video synthesis backend capability

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

use super::types::GenerationRequest;

/// Video returned by the stub backend
pub const STUB_VIDEO_URL: &str =
    "https://cdn.pixabay.com/video/2024/02/09/199958-911669866_large.mp4";

/// Default simulated processing time of the stub backend
pub const STUB_LATENCY_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("Video backend unavailable: {0}")]
    Unavailable(String),

    #[error("Video backend rejected the request: {0}")]
    Rejected(String),

    #[error("Video generation failed: {0}")]
    Failed(String),

    #[error("Video generation timed out")]
    Timeout,
}

/// Pluggable video synthesis capability the endpoint delegates to.
///
/// Implementations own their own concurrency control; the endpoint calls
/// `generate` once per accepted request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoBackend: Send + Sync {
    /// Produce a video for the request and return its URL
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError>;

    /// Backend name for logging and health reporting
    fn name(&self) -> &'static str;
}

/// Fixed-latency backend that always returns the same video
#[derive(Debug, Clone)]
pub struct StubVideoBackend {
    latency: Duration,
    video_url: String,
}

impl StubVideoBackend {
    pub fn new(latency: Duration, video_url: impl Into<String>) -> Self {
        Self {
            latency,
            video_url: video_url.into(),
        }
    }

    /// Stub with no simulated latency (for tests)
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, STUB_VIDEO_URL)
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }
}

impl Default for StubVideoBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(STUB_LATENCY_MS), STUB_VIDEO_URL)
    }
}

#[async_trait]
impl VideoBackend for StubVideoBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        info!(
            "Starting video generation: prompt_len={}, image_name={:?}, duration={}, aspect_ratio={}, motion_bucket_id={}",
            request.prompt.len(),
            request.image_name,
            request.duration,
            request.aspect_ratio,
            request.motion_bucket_id
        );

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        debug!("Stub backend returning {}", self.video_url);
        Ok(self.video_url.clone())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
