// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod generation;
pub mod i18n;
pub mod version;

pub use api::{create_app, AppState, GenerationEndpoint, JwtSessionVerifier, SessionVerifier};
pub use client::{GenerationController, SubmitOutcome, WorkflowState};
pub use config::{ClientConfig, ServerConfig};
pub use generation::{GenerationRequest, GenerationResult, VideoBackend};
