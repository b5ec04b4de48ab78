// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use std::{env, sync::Arc};
use tokio::signal;
use tutormotion::{
    api::{start_server, AppState, GenerationEndpoint, JwtSessionVerifier},
    config::{BackendKind, ServerConfig},
    generation::{HttpVideoBackend, StubVideoBackend, VideoBackend},
    version,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    tracing::info!("Starting {}", version::get_version_string());

    let config = ServerConfig::from_env();
    config.validate().map_err(|e| anyhow!(e))?;

    let backend: Arc<dyn VideoBackend> = match config.backend {
        BackendKind::Stub => {
            tracing::info!(
                "Using stub video backend ({}ms latency)",
                config.stub_latency_ms
            );
            Arc::new(StubVideoBackend::new(
                config.stub_latency(),
                config.stub_video_url.clone(),
            ))
        }
        BackendKind::Http => {
            let url = config
                .backend_url
                .as_deref()
                .ok_or_else(|| anyhow!("VIDEO_BACKEND_URL is required"))?;
            let backend = HttpVideoBackend::new(
                url,
                config.backend_timeout(),
                config.backend_max_concurrent,
            )?;
            if !backend.health_check().await {
                tracing::warn!("Video backend at {} is not healthy yet", url);
            }
            Arc::new(backend)
        }
    };

    let verifier = Arc::new(JwtSessionVerifier::new(&config.session_secret));
    let endpoint = GenerationEndpoint::new(verifier, backend);
    let state = AppState::new(endpoint, config);

    tokio::select! {
        result = start_server(state) => result?,
        _ = signal::ctrl_c() => {
            tracing::info!("Shutting down...");
        }
    }

    Ok(())
}
