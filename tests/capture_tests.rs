// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the capture screen

mod common;

use common::{GatedDetector, Harness, RecordingLibrary, temp_root, test_config};
use photobooth::Message;
use photobooth::app::NotificationKind;
use photobooth::backends::camera::FlashMode;
use std::sync::atomic::Ordering;

async fn start(label: &str) -> Harness {
    Harness::start(temp_root(label), GatedDetector::open(), RecordingLibrary::granted()).await
}

#[tokio::test]
async fn test_capture_writes_sequential_photos() {
    let mut h = start("sequential").await;
    assert!(h.model.capture.directory_ready);
    assert_eq!(h.model.capture.next_photo_id, 1);

    h.dispatch(Message::Capture).await;
    assert!(h.photo("Photo_1.jpg").is_file());
    assert_eq!(h.model.capture.next_photo_id, 2);

    h.dispatch(Message::Capture).await;
    assert!(h.photo("Photo_2.jpg").is_file());
    assert_eq!(h.model.capture.next_photo_id, 3);
    assert_eq!(h.model.capture.photos_taken, 2);

    let last = h.model.capture.last_photo.as_ref().unwrap();
    assert_eq!(last.id, 2);
    assert_eq!(last.path, h.photo("Photo_2.jpg"));

    let notification = h.model.notification.as_ref().unwrap();
    assert_eq!(notification.kind, NotificationKind::Success);
    assert!(notification.text.contains("Photo_2.jpg"));
}

#[tokio::test]
async fn test_ids_seeded_past_existing_files() {
    let root = temp_root("seeded");
    let photos = test_config(root.path()).photos_dir;
    std::fs::create_dir_all(&photos).unwrap();
    std::fs::write(photos.join("Photo_3.jpg"), b"old").unwrap();
    std::fs::write(photos.join("Photo_7.jpg"), b"old").unwrap();
    std::fs::write(photos.join("notes.txt"), b"").unwrap();

    let mut h = Harness::start(root, GatedDetector::open(), RecordingLibrary::granted()).await;
    assert_eq!(h.model.capture.next_photo_id, 8);

    h.dispatch(Message::Capture).await;
    assert!(h.photo("Photo_8.jpg").is_file());
    // Existing photos are never overwritten
    assert_eq!(std::fs::read(h.photo("Photo_7.jpg")).unwrap(), b"old");
}

#[tokio::test]
async fn test_capture_failure_keeps_id() {
    let mut h = start("failure").await;
    h.camera.fail.store(true, Ordering::SeqCst);

    h.dispatch(Message::Capture).await;
    assert!(!h.model.capture.is_capturing);
    assert_eq!(h.model.capture.next_photo_id, 1);
    assert_eq!(h.model.capture.photos_taken, 0);
    assert!(!h.photo("Photo_1.jpg").exists());

    let notification = h.model.notification.as_ref().unwrap();
    assert_eq!(notification.kind, NotificationKind::Error);
    assert!(notification.text.contains("sensor unplugged"));

    // The id that failed is reused by the next successful capture
    h.camera.fail.store(false, Ordering::SeqCst);
    h.dispatch(Message::Capture).await;
    assert!(h.photo("Photo_1.jpg").is_file());
}

#[tokio::test]
async fn test_second_shutter_while_capturing_is_ignored() {
    let mut h = start("single-shutter").await;

    let first = h.model.update(Message::Capture);
    assert!(!first.is_none());
    assert!(h.model.capture.is_capturing);

    let second = h.model.update(Message::Capture);
    assert!(second.is_none());

    h.runtime.spawn(first);
    h.settle().await;
    assert_eq!(h.camera.captures.load(Ordering::SeqCst), 1);
    assert_eq!(h.model.capture.next_photo_id, 2);
}

#[tokio::test]
async fn test_capture_ignored_while_gallery_shown() {
    let mut h = start("gallery-shutter").await;
    h.dispatch(Message::ToggleView).await;

    h.dispatch(Message::Capture).await;
    assert_eq!(h.camera.captures.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_settings_reach_engine() {
    let mut h = start("settings").await;

    h.dispatch(Message::ToggleFlash).await;
    h.dispatch(Message::ZoomIn).await;
    h.dispatch(Message::ZoomIn).await;
    h.dispatch(Message::ToggleFacing).await;

    // Manual focus is locked while auto-focus is on
    h.dispatch(Message::IncreaseFocusDepth).await;
    assert_eq!(h.model.capture.settings.focus_depth, 0.0);
    h.dispatch(Message::ToggleAutoFocus).await;
    h.dispatch(Message::IncreaseFocusDepth).await;
    assert!((h.model.capture.settings.focus_depth - 0.1).abs() < 1e-9);

    h.dispatch(Message::Capture).await;

    let settings = h.camera.last_settings.lock().unwrap().clone().unwrap();
    assert_eq!(settings.flash, FlashMode::On);
    assert!((settings.zoom - 0.2).abs() < 1e-9);
    assert!(!settings.auto_focus.is_on());
    assert_eq!(settings, h.model.capture.settings);
}

#[tokio::test]
async fn test_zoom_clamps_at_bounds() {
    let mut h = start("zoom").await;

    for _ in 0..15 {
        h.dispatch(Message::ZoomIn).await;
    }
    assert_eq!(h.model.capture.settings.zoom, 1.0);

    h.dispatch(Message::SetZoom(f64::NAN)).await;
    assert_eq!(h.model.capture.settings.zoom, 1.0);

    h.dispatch(Message::SetZoom(0.05)).await;
    h.dispatch(Message::ZoomOut).await;
    assert_eq!(h.model.capture.settings.zoom, 0.0);
}

#[tokio::test]
async fn test_unsupported_ratio_falls_back() {
    let root = temp_root("ratio");
    let config = photobooth::Config {
        default_ratio: "21:9".to_string(),
        ..test_config(root.path())
    };
    let mut h = Harness::start_with_config(
        root,
        config,
        GatedDetector::open(),
        RecordingLibrary::granted(),
    )
    .await;

    // First ratio the engine reports
    assert_eq!(h.model.capture.settings.ratio, "4:3");

    h.dispatch(Message::SetRatio("5:4".to_string())).await;
    assert_eq!(h.model.capture.settings.ratio, "4:3");

    h.dispatch(Message::CycleRatio).await;
    assert_eq!(h.model.capture.settings.ratio, "16:9");
    h.dispatch(Message::CycleRatio).await;
    h.dispatch(Message::CycleRatio).await;
    assert_eq!(h.model.capture.settings.ratio, "4:3");
}
