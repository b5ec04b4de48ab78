// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Locale selection and user-facing message lookup
//!
//! Both sides of the generation workflow resolve display strings by key.
//! The `language` request header only changes which table is consulted;
//! it never affects result codes.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNAUTHORIZED: &str = "unauthorized";
pub const PROMPT_OR_IMAGE_REQUIRED: &str = "prompt_or_image_required";
pub const GENERATION_SUCCESSFUL: &str = "generation_successful";
pub const INTERNAL_ERROR: &str = "internal_error";
pub const LOGIN_TO_GET_CREDITS: &str = "login_to_get_credits";
pub const LOGIN_EXPIRED: &str = "login_expired";
pub const GENERATION_SUCCESS: &str = "generation_success";
pub const GENERATION_FAILED: &str = "generation_failed";
pub const GENERATION_ERROR: &str = "generation_error";
pub const MISSING_SCREENSHOT: &str = "missing_screenshot";
pub const GENERATING: &str = "generating";
pub const SAVED_TO: &str = "saved_to";

/// Supported display locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    /// Parse a language tag such as `en`, `en-US` or `zh_CN`.
    ///
    /// Unknown or empty tags fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .trim()
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "zh" => Locale::Zh,
            _ => Locale::En,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Opaque string lookup used by the endpoint and the controller
pub trait Translate: Send + Sync {
    fn lookup(&self, locale: Locale, key: &str) -> String;
}

/// Built-in message tables
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog;

impl Catalog {
    fn english(key: &str) -> Option<&'static str> {
        let msg = match key {
            UNAUTHORIZED => "Unauthorized",
            PROMPT_OR_IMAGE_REQUIRED => "Prompt or Image is required",
            GENERATION_SUCCESSFUL => "Video generation successful",
            INTERNAL_ERROR => "Internal Server Error",
            LOGIN_TO_GET_CREDITS => "Please sign in to generate videos",
            LOGIN_EXPIRED => "Your session has expired, please sign in again",
            GENERATION_SUCCESS => "Your tutorial video is ready",
            GENERATION_FAILED => "Video generation failed",
            GENERATION_ERROR => "Something went wrong while generating the video",
            MISSING_SCREENSHOT => "Please upload a screenshot first.",
            GENERATING => "Generating your tutorial video...",
            SAVED_TO => "Saved to",
            _ => return None,
        };
        Some(msg)
    }

    fn chinese(key: &str) -> Option<&'static str> {
        let msg = match key {
            UNAUTHORIZED => "未授权",
            PROMPT_OR_IMAGE_REQUIRED => "需要提供描述或图片",
            GENERATION_SUCCESSFUL => "视频生成成功",
            INTERNAL_ERROR => "服务器内部错误",
            LOGIN_TO_GET_CREDITS => "请登录后生成视频",
            LOGIN_EXPIRED => "登录已过期，请重新登录",
            GENERATION_SUCCESS => "教程视频已生成",
            GENERATION_FAILED => "视频生成失败",
            GENERATION_ERROR => "生成视频时出错",
            MISSING_SCREENSHOT => "请先上传截图。",
            GENERATING => "正在生成教程视频...",
            SAVED_TO => "已保存到",
            _ => return None,
        };
        Some(msg)
    }
}

impl Translate for Catalog {
    fn lookup(&self, locale: Locale, key: &str) -> String {
        let found = match locale {
            Locale::En => Self::english(key),
            Locale::Zh => Self::chinese(key).or_else(|| Self::english(key)),
        };
        found.unwrap_or(key).to_string()
    }
}
