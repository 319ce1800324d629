// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for photo operations
//!
//! This module provides command-line functionality for:
//! - Listing the photos directory
//! - Taking a single photo
//! - Printing face overlays for a photo
//! - Saving photos to the shared library
//!
//! Commands drive the same `AppModel` the terminal UI uses, on a private
//! tokio runtime, and report the resulting state.

use photobooth::app::gallery::{DetectionOutcome, FaceIndex};
use photobooth::app::{AppModel, Message, NotificationKind, Runtime, Services};
use photobooth::backends::face_detection::{DetectionOptions, FaceDetector, SidecarFaceDetector};
use photobooth::config::Config;
use photobooth::errors::{AppError, AppResult};
use photobooth::storage::{FileStorage, LocalStorage, parse_photo_id, photo_path};
use std::path::PathBuf;

/// Config plus the image the virtual camera replays
pub fn resolve_source(source: Option<PathBuf>) -> AppResult<(Config, PathBuf)> {
    let config = Config::load()?;
    let source = source
        .or_else(|| config.camera_source.clone())
        .ok_or_else(|| {
            AppError::Config(
                "No camera source; pass --source or set camera_source in the config".into(),
            )
        })?;
    if !source.is_file() {
        return Err(AppError::Config(format!(
            "Camera source not found: {}",
            source.display()
        )));
    }
    Ok((config, source))
}

/// Run a model from startup until all work has settled
async fn settle(model: &mut AppModel, runtime: &mut Runtime<Message>) {
    runtime.run_until_idle(model, AppModel::update).await;
}

/// Apply one message and drive its follow-up work to completion
async fn dispatch(model: &mut AppModel, runtime: &mut Runtime<Message>, message: Message) {
    let task = model.update(message);
    runtime.spawn(task);
    settle(model, runtime).await;
}

/// List all photos in the photos directory
pub fn list_photos() -> AppResult<()> {
    let config = Config::load()?;
    let rt = tokio::runtime::Runtime::new()?;
    let names = rt.block_on(async { LocalStorage.list_directory(&config.photos_dir).await });

    let mut names: Vec<String> = match names {
        Ok(names) => names,
        Err(err) => {
            println!("No photos directory: {}", err);
            return Ok(());
        }
    };

    if names.is_empty() {
        println!("No photos yet.");
        return Ok(());
    }

    // Numbered photos first, in capture order
    names.sort_by_key(|name| (parse_photo_id(name).unwrap_or(u32::MAX), name.clone()));

    println!("Photos in {}:", config.photos_dir.display());
    println!();
    for name in &names {
        println!("  {}", name);
    }
    println!();
    println!("{} photo(s)", names.len());
    Ok(())
}

/// Take one photo through the full capture path
pub fn snap(source: Option<PathBuf>) -> AppResult<()> {
    let (config, source) = resolve_source(source)?;
    println!("Using source: {}", source.display());

    let services = Services::local(&config, source);
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let (mut model, startup) = AppModel::new(config, services);
        let mut runtime = Runtime::new();
        runtime.spawn(startup);
        settle(&mut model, &mut runtime).await;

        println!("Capturing...");
        dispatch(&mut model, &mut runtime, Message::Capture).await;

        match (&model.capture.last_photo, &model.notification) {
            (Some(photo), _) => {
                println!("Photo saved: {}", photo.path.display());
                Ok(())
            }
            (None, Some(notification)) => Err(AppError::Other(notification.text.clone())),
            (None, None) => Err(AppError::Other("Capture did not complete".into())),
        }
    })
}

/// Print the face overlays of a photo as drawn on a gallery thumbnail
pub fn faces(name: &str) -> AppResult<()> {
    let config = Config::load()?;
    let path = photo_path(&config.photos_dir, name);
    let box_size = config.thumbnail_size;
    let detector = SidecarFaceDetector::new(config.faces_dir.clone());

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(detector.detect(&path, DetectionOptions::GALLERY))?;
    let outcome = DetectionOutcome::Detected {
        path: path.clone(),
        result,
    };

    let index = FaceIndex::new().merged(outcome);
    if let Some(reason) = index.failure(&path) {
        return Err(AppError::Other(format!(
            "Face detection failed for {}: {}",
            name, reason
        )));
    }

    let overlays = index.overlays(&path, box_size);
    if let Some(entry) = index.get(&path) {
        println!(
            "{} ({}x{}) on a {}px thumbnail:",
            name,
            entry.dimensions.width(),
            entry.dimensions.height(),
            box_size
        );
    }

    if overlays.is_empty() {
        println!("  No faces.");
        return Ok(());
    }

    for (i, overlay) in overlays.iter().enumerate() {
        let smile = overlay
            .smiling_probability
            .map(|p| format!(", smiling {:.0}%", p * 100.0))
            .unwrap_or_default();
        println!(
            "  [{}] left {:.2}, top {:.2}, {:.2}x{:.2}, roll {:.1}°, yaw {:.1}°{}",
            i,
            overlay.rect.left,
            overlay.rect.top,
            overlay.rect.width,
            overlay.rect.height,
            overlay.roll_angle,
            overlay.yaw_angle,
            smile
        );
    }
    Ok(())
}

/// Select the named photos in the gallery and save them to the library
pub fn export(names: &[String]) -> AppResult<()> {
    let mut config = Config::load()?;
    // Overlays are irrelevant here
    config.detect_faces = false;
    let photos_dir = config.photos_dir.clone();
    let library_dir = config.library_dir.clone();

    // Export never captures, so the camera source is irrelevant
    let services = Services::local(&config, PathBuf::new());
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let (mut model, startup) = AppModel::new(config, services);
        let mut runtime = Runtime::new();
        runtime.spawn(startup);
        settle(&mut model, &mut runtime).await;

        dispatch(&mut model, &mut runtime, Message::ToggleView).await;

        for name in names {
            let path = photo_path(&photos_dir, name);
            if !model.gallery.is_listed(&path) {
                println!("Skipping {}: not in {}", name, photos_dir.display());
                continue;
            }
            dispatch(
                &mut model,
                &mut runtime,
                Message::ToggleSelection {
                    path,
                    selected: true,
                },
            )
            .await;
        }

        dispatch(&mut model, &mut runtime, Message::SaveSelected).await;

        let Some(notification) = model.notification.take() else {
            return Err(AppError::Other("Export did not complete".into()));
        };
        match notification.kind {
            NotificationKind::Error => Err(AppError::Other(notification.text)),
            NotificationKind::Success => {
                println!("{} ({})", notification.text, library_dir.display());
                Ok(())
            }
            NotificationKind::Info => {
                println!("{}", notification.text);
                Ok(())
            }
        }
    })
}
