// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Screenshot loading and preview rendering

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use std::path::Path;
use thiserror::Error;

/// Maximum screenshot size (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,

    #[error("Failed to read image file: {0}")]
    Io(#[from] std::io::Error),
}

/// A screenshot chosen by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// File name, sent to the endpoint as `image_name`
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, PreviewError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }
}

/// Displayable preview of a screenshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    /// `data:<mime>;base64,...`
    pub data_url: String,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub size_bytes: usize,
}

/// Turns a selected file into a preview
#[async_trait]
pub trait PreviewDecoder: Send + Sync {
    async fn decode(&self, file: &ImageFile) -> Result<ImagePreview, PreviewError>;
}

/// Decodes with the `image` crate on the blocking pool
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagePreviewDecoder;

#[async_trait]
impl PreviewDecoder for ImagePreviewDecoder {
    async fn decode(&self, file: &ImageFile) -> Result<ImagePreview, PreviewError> {
        let bytes = file.bytes.clone();
        tokio::task::spawn_blocking(move || render_preview(&bytes))
            .await
            .map_err(|e| PreviewError::DecodeFailed(e.to_string()))?
    }
}

/// Decode raw image bytes and render them as a data URL preview
pub fn render_preview(bytes: &[u8]) -> Result<ImagePreview, PreviewError> {
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(PreviewError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }

    if bytes.is_empty() {
        return Err(PreviewError::EmptyData);
    }

    let format = detect_format(bytes)?;

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| PreviewError::DecodeFailed(e.to_string()))?;

    Ok(ImagePreview {
        data_url: format!("data:{};base64,{}", mime_type(format), STANDARD.encode(bytes)),
        width: img.width(),
        height: img.height(),
        format,
        size_bytes: bytes.len(),
    })
}

/// Detect image format from magic bytes
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, PreviewError> {
    if bytes.len() < 4 {
        return Err(PreviewError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),

        // GIF87a / GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),

        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),

        // TIFF: II or MM
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Ok(ImageFormat::Tiff),

        _ => Err(PreviewError::UnsupportedFormat),
    }
}

pub fn mime_type(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Gif => "image/gif",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Tiff => "image/tiff",
        _ => "application/octet-stream",
    }
}
