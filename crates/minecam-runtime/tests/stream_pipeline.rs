//! End-to-end tests of the stream processor against a fake decoder.
//!
//! A shell script stands in for ffmpeg: it ignores its arguments and writes
//! raw frames (or nothing) to stdout. A local TCP listener makes the RTSP
//! reachability probe succeed.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use minecam_core::{Camera, EnhanceParamsStore};
use minecam_runtime::{StreamSettings, VideoStreamManager, VideoStreamProcessor};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::time::{Instant, sleep};

const WIDTH: u32 = 4;
const HEIGHT: u32 = 2;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn settings(ffmpeg: PathBuf) -> StreamSettings {
    StreamSettings {
        ffmpeg: Some(ffmpeg),
        width: WIDTH,
        height: HEIGHT,
        probe_timeout: Duration::from_secs(1),
        restart_delay: Duration::from_millis(10),
    }
}

async fn wait_until<F: Fn() -> bool>(check: F) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        sleep(Duration::from_millis(20)).await;
    }
    false
}

async fn rtsp_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, format!("rtsp://127.0.0.1:{port}/live"))
}

#[tokio::test]
async fn publishes_original_and_enhanced_frames() {
    let temp = TempDir::new().unwrap();
    // 24 bytes per 4x2 BGR frame
    let ffmpeg = write_script(
        temp.path(),
        "ffmpeg",
        "while true; do printf 'AAAAAAAAAAAAAAAAAAAAAAAA'; sleep 0.01; done",
    );
    let (_listener, url) = rtsp_listener().await;

    let processor =
        VideoStreamProcessor::start("camera-1", &url, None, &settings(ffmpeg), EnhanceParamsStore::new())
            .await;
    assert!(processor.is_running());

    assert!(wait_until(|| processor.enhanced_frame().is_some()).await);
    let original = processor.original_frame().unwrap();
    assert_eq!(original.width(), WIDTH);
    assert_eq!(original.height(), HEIGHT);
    assert!(original.data().iter().all(|&b| b == b'A'));
    assert_eq!(
        processor.enhanced_frame().unwrap().data().len(),
        (WIDTH * HEIGHT * 3) as usize
    );

    processor.stop().await;
    assert!(!processor.is_running());
}

#[tokio::test]
async fn gives_up_after_repeated_read_failures() {
    let temp = TempDir::new().unwrap();
    let ffmpeg = write_script(temp.path(), "ffmpeg", "echo 'Connection refused' >&2; exit 1");
    let (_listener, url) = rtsp_listener().await;

    let processor =
        VideoStreamProcessor::start("camera-2", &url, None, &settings(ffmpeg), EnhanceParamsStore::new())
            .await;

    assert!(wait_until(|| !processor.is_running()).await);
    assert!(processor.enhanced_frame().is_none());
    assert!(
        wait_until(|| {
            processor
                .logs()
                .entries()
                .iter()
                .any(|e| e.line.contains("Connection refused"))
        })
        .await
    );
    processor.stop().await;
}

#[tokio::test]
async fn manager_reports_running_camera() {
    let temp = TempDir::new().unwrap();
    let ffmpeg = write_script(
        temp.path(),
        "ffmpeg",
        "while true; do printf 'BBBBBBBBBBBBBBBBBBBBBBBB'; sleep 0.01; done",
    );
    let (_listener, url) = rtsp_listener().await;

    let manager = VideoStreamManager::new(settings(ffmpeg), EnhanceParamsStore::new());
    manager.register_camera(&Camera::new("camera-1", url)).await;
    manager
        .register_camera(&Camera::new("camera-2", "rtsp://localhost:8554/camera-2"))
        .await;

    assert!(manager.is_running("camera-1").await);
    assert!(!manager.is_running("camera-2").await);

    let processor = manager.get_processor("camera-1").await.unwrap();
    assert!(wait_until(|| processor.original_frame().is_some()).await);
    assert!(manager.original_frame("camera-1").await.is_some());

    manager.stop_all().await;
    assert!(!processor.is_running());
    assert!(manager.camera_ids().await.is_empty());
}
