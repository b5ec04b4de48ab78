// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Video generation API endpoint module
//!
//! Provides POST /api/ai/text-to-video for screenshot-to-tutorial generation.

pub mod endpoint;
pub mod handler;

pub use endpoint::GenerationEndpoint;
pub use handler::{generate_video_handler, respond, LANGUAGE_HEADER};
