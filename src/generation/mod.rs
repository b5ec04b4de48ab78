// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Screenshot-to-video generation: wire contract and backend capability

pub mod backend;
pub mod remote;
pub mod types;

pub use backend::{BackendError, StubVideoBackend, VideoBackend, STUB_LATENCY_MS, STUB_VIDEO_URL};
pub use remote::HttpVideoBackend;
pub use types::{
    GenerationRequest, GenerationResponse, GenerationResult, GenerationSettings, ResultCode,
    VideoData,
};
