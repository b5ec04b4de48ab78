// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client configuration for the generation controller

use std::env;
use std::time::Duration;

use crate::generation::GenerationSettings;
use crate::i18n::Locale;

/// Path of the generator page, recorded as the login redirect target
pub const GENERATOR_PATH: &str = "/text-to-video/tutorial";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the generation endpoint server
    pub server_url: String,
    /// Display locale, also sent as the `language` header
    pub locale: Locale,
    /// Where to return after signing in
    pub current_path: String,
    /// Upper bound on one generation round trip
    pub request_timeout: Duration,
    /// Fixed values sent with every request
    pub settings: GenerationSettings,
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_url: env::var("TUTORMOTION_SERVER_URL").unwrap_or(defaults.server_url),
            locale: env::var("TUTORMOTION_LOCALE")
                .map(|v| Locale::from_tag(&v))
                .unwrap_or(defaults.locale),
            current_path: defaults.current_path,
            request_timeout: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            settings: defaults.settings,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        url::Url::parse(&self.server_url)
            .map_err(|e| format!("invalid server URL '{}': {}", self.server_url, e))?;
        if self.request_timeout.is_zero() {
            return Err("Request timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".to_string(),
            locale: Locale::En,
            current_path: GENERATOR_PATH.to_string(),
            request_timeout: Duration::from_secs(120),
            settings: GenerationSettings::default(),
        }
    }
}
