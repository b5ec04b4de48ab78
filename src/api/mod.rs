// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod auth;
pub mod errors;
pub mod generate_video;
pub mod http_server;

pub use auth::{extract_credential, AuthError, JwtSessionVerifier, SessionClaims, SessionVerifier};
pub use errors::ApiError;
pub use generate_video::{generate_video_handler, GenerationEndpoint};
pub use http_server::{create_app, start_server, AppState, GENERATE_ROUTE};
