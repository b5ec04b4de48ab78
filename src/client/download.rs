// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Saving a generated tutorial video to disk

use chrono::{DateTime, Utc};
use futures::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Download failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Video server returned {0}")]
    Status(u16),

    #[error("Failed to write video: {0}")]
    Io(#[from] std::io::Error),
}

/// File name for a video saved at `now`: `tutormotion-<unix-millis>.mp4`
pub fn suggested_file_name(now: DateTime<Utc>) -> String {
    format!("tutormotion-{}.mp4", now.timestamp_millis())
}

pub struct VideoDownloader {
    client: Client,
}

impl VideoDownloader {
    pub fn new(timeout: Duration) -> Result<Self, DownloadError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Stream `video_url` into `dir`, returning the written path
    pub async fn download(&self, video_url: &str, dir: &Path) -> Result<PathBuf, DownloadError> {
        let response = self.client.get(video_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status(status.as_u16()));
        }

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(suggested_file_name(Utc::now()));
        let mut file = tokio::fs::File::create(&path).await?;

        let mut written = 0usize;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            written += chunk.len();
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        debug!("Wrote {} bytes", written);
        info!("Saved tutorial video to {}", path.display());
        Ok(path)
    }
}
