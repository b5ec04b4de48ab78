// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server configuration loaded from the environment

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::generation::{STUB_LATENCY_MS, STUB_VIDEO_URL};

/// Which video backend the endpoint delegates to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    Stub,
    Http,
}

impl BackendKind {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "stub" | "mock" => Some(BackendKind::Stub),
            "http" | "remote" => Some(BackendKind::Http),
            _ => None,
        }
    }
}

/// Configuration for the generation endpoint server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// HS256 secret used to verify session tokens
    pub session_secret: String,
    /// Selected backend
    pub backend: BackendKind,
    /// Synthesis service base URL (http backend only)
    pub backend_url: Option<String>,
    /// Per-job timeout for the http backend in seconds
    pub backend_timeout_secs: u64,
    /// Concurrent synthesis jobs allowed by the http backend
    pub backend_max_concurrent: usize,
    /// Simulated processing time of the stub backend
    pub stub_latency_ms: u64,
    /// Video returned by the stub backend
    pub stub_video_url: String,
    /// Allow any origin in CORS responses
    pub cors_allow_any: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("API_HOST").unwrap_or(defaults.host),
            port: env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            session_secret: env::var("SESSION_SECRET").unwrap_or_default(),
            backend: env::var("VIDEO_BACKEND")
                .ok()
                .and_then(|v| BackendKind::parse(&v))
                .unwrap_or(defaults.backend),
            backend_url: env::var("VIDEO_BACKEND_URL").ok(),
            backend_timeout_secs: env::var("VIDEO_BACKEND_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.backend_timeout_secs),
            backend_max_concurrent: env::var("VIDEO_BACKEND_MAX_CONCURRENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.backend_max_concurrent),
            stub_latency_ms: env::var("STUB_LATENCY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.stub_latency_ms),
            stub_video_url: env::var("STUB_VIDEO_URL").unwrap_or(defaults.stub_video_url),
            cors_allow_any: env::var("CORS_ALLOW_ANY")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(defaults.cors_allow_any),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.session_secret.len() < 16 {
            return Err("SESSION_SECRET must be at least 16 characters".to_string());
        }
        if self.backend == BackendKind::Http {
            match self.backend_url.as_deref() {
                Some(u) if url::Url::parse(u).is_ok() => {}
                Some(u) => return Err(format!("VIDEO_BACKEND_URL is not a valid URL: {}", u)),
                None => {
                    return Err("VIDEO_BACKEND_URL is required when VIDEO_BACKEND=http".to_string())
                }
            }
            if self.backend_timeout_secs == 0 {
                return Err("Backend timeout must be greater than 0".to_string());
            }
            if self.backend_max_concurrent == 0 {
                return Err("Backend concurrency must be greater than 0".to_string());
            }
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }

    pub fn stub_latency(&self) -> Duration {
        Duration::from_millis(self.stub_latency_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            session_secret: String::new(),
            backend: BackendKind::Stub,
            backend_url: None,
            backend_timeout_secs: 300,
            backend_max_concurrent: 4,
            stub_latency_ms: STUB_LATENCY_MS,
            stub_video_url: STUB_VIDEO_URL.to_string(),
            cors_allow_any: true,
        }
    }
}
