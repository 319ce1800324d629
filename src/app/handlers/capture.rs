// SPDX-License-Identifier: GPL-3.0-only

//! Capture operations handlers
//!
//! Handles the camera setting cycles, zoom and focus steps, and photo capture.

use crate::app::state::{AppModel, Message, Notification, PhotoRecord};
use crate::app::task::Task;
use crate::backends::camera::{CaptureEngine, CaptureSettings};
use crate::constants::capture::{FOCUS_STEP, ZOOM_STEP};
use crate::errors::CaptureError;
use crate::storage::{FileStorage, photo_file_name};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Capture one photo and move it to `target`
///
/// The id is only consumed by the caller once this returns `Ok`.
pub async fn capture_photo(
    camera: &dyn CaptureEngine,
    storage: &dyn FileStorage,
    settings: &CaptureSettings,
    id: u32,
    target: PathBuf,
) -> Result<PhotoRecord, CaptureError> {
    let captured = camera.capture(settings).await?;
    storage.move_file(&captured.path, &target).await?;
    Ok(PhotoRecord {
        id,
        path: target,
        captured_at: chrono::Local::now(),
    })
}

impl AppModel {
    // =========================================================================
    // Setting Cycles
    // =========================================================================

    pub(crate) fn handle_toggle_facing(&mut self) -> Task<Message> {
        self.capture.settings.facing = self.capture.settings.facing.toggle();
        info!(facing = self.capture.settings.facing.display_name(), "Camera facing toggled");
        Task::none()
    }

    pub(crate) fn handle_toggle_flash(&mut self) -> Task<Message> {
        self.capture.settings.flash = self.capture.settings.flash.next();
        info!(flash = self.capture.settings.flash.display_name(), "Flash mode changed");
        Task::none()
    }

    pub(crate) fn handle_toggle_white_balance(&mut self) -> Task<Message> {
        self.capture.settings.white_balance = self.capture.settings.white_balance.next();
        info!(
            white_balance = self.capture.settings.white_balance.display_name(),
            "White balance changed"
        );
        Task::none()
    }

    pub(crate) fn handle_toggle_auto_focus(&mut self) -> Task<Message> {
        self.capture.settings.auto_focus = self.capture.settings.auto_focus.toggle();
        info!(
            auto_focus = self.capture.settings.auto_focus.display_name(),
            "Auto-focus toggled"
        );
        Task::none()
    }

    // =========================================================================
    // Zoom & Focus
    // =========================================================================

    pub(crate) fn handle_zoom_in(&mut self) -> Task<Message> {
        self.capture.settings.adjust_zoom(ZOOM_STEP);
        debug!(zoom = self.capture.settings.zoom, "Zoom in");
        Task::none()
    }

    pub(crate) fn handle_zoom_out(&mut self) -> Task<Message> {
        self.capture.settings.adjust_zoom(-ZOOM_STEP);
        debug!(zoom = self.capture.settings.zoom, "Zoom out");
        Task::none()
    }

    pub(crate) fn handle_set_zoom(&mut self, value: f64) -> Task<Message> {
        if !self.capture.settings.set_zoom(value) {
            warn!(value, "Ignoring invalid zoom value");
        }
        Task::none()
    }

    pub(crate) fn handle_adjust_focus_depth(&mut self, increase: bool) -> Task<Message> {
        // Manual focus is locked while auto-focus drives the lens
        if self.capture.settings.auto_focus.is_on() {
            debug!("Focus depth ignored while auto-focus is on");
            return Task::none();
        }
        let delta = if increase { FOCUS_STEP } else { -FOCUS_STEP };
        self.capture.settings.adjust_focus_depth(delta);
        debug!(focus_depth = self.capture.settings.focus_depth, "Focus depth adjusted");
        Task::none()
    }

    pub(crate) fn handle_set_focus_depth(&mut self, value: f64) -> Task<Message> {
        if self.capture.settings.auto_focus.is_on() {
            debug!("Focus depth ignored while auto-focus is on");
            return Task::none();
        }
        if !self.capture.settings.set_focus_depth(value) {
            warn!(value, "Ignoring invalid focus depth");
        }
        Task::none()
    }

    // =========================================================================
    // Aspect Ratio
    // =========================================================================

    pub(crate) fn handle_set_ratio(&mut self, ratio: String) -> Task<Message> {
        let supported = &self.capture.supported_ratios;
        if !supported.is_empty() && !supported.contains(&ratio) {
            warn!(ratio = %ratio, ?supported, "Unsupported aspect ratio");
            return Task::none();
        }
        info!(ratio = %ratio, "Aspect ratio set");
        self.capture.settings.ratio = ratio;
        Task::none()
    }

    pub(crate) fn handle_cycle_ratio(&mut self) -> Task<Message> {
        let ratios = &self.capture.supported_ratios;
        if ratios.is_empty() {
            debug!("No supported ratios to cycle through");
            return Task::none();
        }
        let next = ratios
            .iter()
            .position(|r| *r == self.capture.settings.ratio)
            .map(|i| (i + 1) % ratios.len())
            .unwrap_or(0);
        let ratio = ratios[next].clone();
        self.handle_set_ratio(ratio)
    }

    // =========================================================================
    // Capture
    // =========================================================================

    /// Capture with the current settings into `Photo_<id>.jpg`
    pub(crate) fn handle_capture(&mut self) -> Task<Message> {
        if self.show_gallery {
            debug!("Capture ignored while gallery is shown");
            return Task::none();
        }
        if self.capture.is_capturing {
            warn!("Capture already in progress");
            return Task::none();
        }
        if !self.capture.directory_ready {
            warn!("Capture requested before photos directory is ready");
            self.notification = Some(Notification::error("Photos directory is not ready yet"));
            return Task::none();
        }

        let id = self.capture.next_photo_id;
        let target = self.config.photos_dir.join(photo_file_name(id));
        let settings = self.capture.settings.clone();
        let camera = Arc::clone(&self.services.camera);
        let storage = Arc::clone(&self.services.storage);

        info!(id, target = %target.display(), "Capturing photo...");
        self.capture.is_capturing = true;

        Task::perform(
            async move {
                capture_photo(camera.as_ref(), storage.as_ref(), &settings, id, target).await
            },
            Message::PhotoSaved,
        )
    }

    pub(crate) fn handle_photo_saved(
        &mut self,
        result: Result<PhotoRecord, CaptureError>,
    ) -> Task<Message> {
        self.capture.is_capturing = false;
        match result {
            Ok(record) => {
                info!(id = record.id, path = %record.path.display(), "Photo saved successfully");
                self.capture.next_photo_id =
                    self.capture.next_photo_id.max(record.id.saturating_add(1));
                self.capture.photos_taken += 1;
                let name = record
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.notification = Some(Notification::success(format!("Saved {}", name)));
                self.capture.last_photo = Some(record);
            }
            Err(err) => {
                error!(error = %err, "Failed to save photo");
                self.notification = Some(Notification::error(err.to_string()));
            }
        }
        Task::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_target_name() {
        let dir = PathBuf::from("/photos");
        assert_eq!(dir.join(photo_file_name(3)), PathBuf::from("/photos/Photo_3.jpg"));
    }
}
