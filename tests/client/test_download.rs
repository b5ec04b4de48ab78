// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Saving generated videos

use axum::{http::StatusCode, routing::get, Router};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tutormotion::client::{DownloadError, VideoDownloader};

const VIDEO_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42fake-video-payload";

async fn spawn_file_server() -> SocketAddr {
    let app = Router::new()
        .route("/video.mp4", get(|| async { VIDEO_BYTES.to_vec() }))
        .route("/missing.mp4", get(|| async { StatusCode::NOT_FOUND }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_download_writes_video_file() {
    let addr = spawn_file_server().await;
    let dir = tempfile::tempdir().unwrap();
    let downloader = VideoDownloader::new(Duration::from_secs(10)).unwrap();

    let path = downloader
        .download(&format!("http://{}/video.mp4", addr), &dir.path().join("videos"))
        .await
        .unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("tutormotion-"));
    assert!(name.ends_with(".mp4"));
    assert_eq!(std::fs::read(&path).unwrap(), VIDEO_BYTES);
}

#[tokio::test]
async fn test_download_reports_http_status() {
    let addr = spawn_file_server().await;
    let dir = tempfile::tempdir().unwrap();
    let downloader = VideoDownloader::new(Duration::from_secs(10)).unwrap();

    let err = downloader
        .download(&format!("http://{}/missing.mp4", addr), dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Status(404)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
