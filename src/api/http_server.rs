// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::generate_video::{generate_video_handler, GenerationEndpoint};
use crate::config::ServerConfig;
use crate::version;

/// Route of the generation endpoint
pub const GENERATE_ROUTE: &str = "/api/ai/text-to-video";

#[derive(Clone)]
pub struct AppState {
    pub endpoint: Arc<GenerationEndpoint>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(endpoint: GenerationEndpoint, config: ServerConfig) -> Self {
        Self {
            endpoint: Arc::new(endpoint),
            config: Arc::new(config),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_handler))
        .route(GENERATE_ROUTE, post(generate_video_handler))
        .layer(TraceLayer::new_for_http());

    if state.config.cors_allow_any {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.with_state(state)
}

pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.socket_addr()?;
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut info = version::get_version_info();
    info["status"] = json!("ok");
    info["backend"] = json!(state.endpoint.backend_name());
    Json(info)
}
