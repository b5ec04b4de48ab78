// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wire types shared by the generation endpoint and the controller

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::i18n::{self, Locale, Translate};

/// Fixed generation parameters sent with every request.
///
/// Not user-editable; passed through to the backend unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub duration: String,
    pub aspect_ratio: String,
    pub motion_bucket_id: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            duration: "5".to_string(),
            aspect_ratio: "16:9".to_string(),
            motion_bucket_id: "127".to_string(),
        }
    }
}

/// Request body for POST /api/ai/text-to-video
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Free-text description of the interaction to animate
    #[serde(default, deserialize_with = "null_as_empty")]
    pub prompt: String,

    /// Name of the uploaded screenshot
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_name: String,

    #[serde(default, deserialize_with = "scalar_as_string")]
    pub duration: String,

    #[serde(default, rename = "aspectRatio", deserialize_with = "scalar_as_string")]
    pub aspect_ratio: String,

    #[serde(default, deserialize_with = "scalar_as_string")]
    pub motion_bucket_id: String,
}

/// `null` reads as an empty string
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Settings arrive as strings, but numbers and booleans are passed
/// through in their JSON text form
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        v @ (Value::Number(_) | Value::Bool(_)) => Ok(v.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {}",
            other
        ))),
    }
}

impl GenerationRequest {
    pub fn new(
        prompt: impl Into<String>,
        image_name: impl Into<String>,
        settings: &GenerationSettings,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            image_name: image_name.into(),
            duration: settings.duration.clone(),
            aspect_ratio: settings.aspect_ratio.clone(),
            motion_bucket_id: settings.motion_bucket_id.clone(),
        }
    }

    /// At least one of prompt or image must be supplied
    pub fn validate(&self) -> Result<(), String> {
        if self.prompt.is_empty() && self.image_name.is_empty() {
            return Err("prompt or image_name must be provided".to_string());
        }
        Ok(())
    }
}

/// Result codes carried in the response envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    BadRequest,
    Unauthorized,
    Internal,
}

impl ResultCode {
    pub fn as_u16(&self) -> u16 {
        match self {
            ResultCode::Success => 1000,
            ResultCode::BadRequest => 400,
            ResultCode::Unauthorized => 401,
            ResultCode::Internal => 500,
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            1000 => Some(ResultCode::Success),
            400 => Some(ResultCode::BadRequest),
            401 => Some(ResultCode::Unauthorized),
            500 => Some(ResultCode::Internal),
            _ => None,
        }
    }

    /// HTTP status mirroring this code (success maps to 200)
    pub fn http_status(&self) -> u16 {
        match self {
            ResultCode::Success => 200,
            other => other.as_u16(),
        }
    }
}

/// Outcome of one generation request. Exactly one variant per response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Success { video_url: String },
    AuthExpired { message: String },
    ValidationFailed { message: String },
    InternalError { message: String },
}

impl GenerationResult {
    pub fn code(&self) -> ResultCode {
        match self {
            GenerationResult::Success { .. } => ResultCode::Success,
            GenerationResult::AuthExpired { .. } => ResultCode::Unauthorized,
            GenerationResult::ValidationFailed { .. } => ResultCode::BadRequest,
            GenerationResult::InternalError { .. } => ResultCode::Internal,
        }
    }

    /// Build the wire envelope. Only the success message is looked up;
    /// failure messages are already resolved.
    pub fn to_response(&self, translate: &dyn Translate, locale: Locale) -> GenerationResponse {
        match self {
            GenerationResult::Success { video_url } => GenerationResponse {
                code: ResultCode::Success.as_u16(),
                message: translate.lookup(locale, i18n::GENERATION_SUCCESSFUL),
                data: Some(VideoData {
                    video_url: video_url.clone(),
                }),
            },
            GenerationResult::AuthExpired { message }
            | GenerationResult::ValidationFailed { message }
            | GenerationResult::InternalError { message } => GenerationResponse {
                code: self.code().as_u16(),
                message: message.clone(),
                data: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoData {
    #[serde(rename = "videoUrl", default)]
    pub video_url: String,
}

/// Response envelope: `{ code, message, data? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub code: u16,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<VideoData>,
}

impl GenerationResponse {
    /// Interpret a received envelope together with its HTTP status.
    ///
    /// A 401 in either the status or the code means the session expired.
    /// Success requires code 1000 and a non-empty video URL.
    pub fn interpret(
        self,
        http_status: u16,
        translate: &dyn Translate,
        locale: Locale,
    ) -> GenerationResult {
        let message = |fallback: &str| {
            if self.message.is_empty() {
                translate.lookup(locale, fallback)
            } else {
                self.message.clone()
            }
        };

        if http_status == 401 || self.code == ResultCode::Unauthorized.as_u16() {
            return GenerationResult::AuthExpired {
                message: message(i18n::LOGIN_EXPIRED),
            };
        }

        match ResultCode::from_u16(self.code) {
            Some(ResultCode::Success) => match self.data.as_ref() {
                Some(data) if !data.video_url.is_empty() => GenerationResult::Success {
                    video_url: data.video_url.clone(),
                },
                _ => GenerationResult::InternalError {
                    message: translate.lookup(locale, i18n::GENERATION_FAILED),
                },
            },
            Some(ResultCode::BadRequest) => GenerationResult::ValidationFailed {
                message: message(i18n::GENERATION_FAILED),
            },
            _ => GenerationResult::InternalError {
                message: message(i18n::GENERATION_FAILED),
            },
        }
    }
}
