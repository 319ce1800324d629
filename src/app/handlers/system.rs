// SPDX-License-Identifier: GPL-3.0-only

//! Startup and navigation handlers

use crate::app::state::{AppModel, Message, Notification};
use crate::app::task::Task;
use crate::errors::{CaptureError, StorageError};
use crate::storage::next_photo_id;
use tracing::{error, info, warn};

impl AppModel {
    // =========================================================================
    // Startup Handlers
    // =========================================================================

    pub(crate) fn handle_photos_directory_ready(
        &mut self,
        result: Result<Vec<String>, StorageError>,
    ) -> Task<Message> {
        match result {
            Ok(names) => {
                // Never hand out an id that is already on disk
                let seeded = next_photo_id(&names);
                self.capture.next_photo_id = self.capture.next_photo_id.max(seeded);
                self.capture.directory_ready = true;
                info!(
                    existing = names.len(),
                    next_photo_id = self.capture.next_photo_id,
                    "Photo ids seeded"
                );
            }
            Err(err) => {
                error!(error = %err, "Photos directory unavailable");
                self.notification = Some(Notification::error(format!(
                    "Photos directory unavailable: {}",
                    err
                )));
            }
        }
        Task::none()
    }

    pub(crate) fn handle_ratios_loaded(
        &mut self,
        result: Result<Vec<String>, CaptureError>,
    ) -> Task<Message> {
        match result {
            Ok(ratios) => {
                info!(?ratios, "Supported ratios loaded");
                if !ratios.is_empty() && !ratios.contains(&self.capture.settings.ratio) {
                    warn!(
                        configured = %self.capture.settings.ratio,
                        fallback = %ratios[0],
                        "Configured ratio not supported by engine"
                    );
                    self.capture.settings.ratio = ratios[0].clone();
                }
                self.capture.supported_ratios = ratios;
            }
            Err(err) => {
                // Any ratio stays selectable
                warn!(error = %err, "Could not query supported ratios");
            }
        }
        Task::none()
    }

    // =========================================================================
    // Navigation Handlers
    // =========================================================================

    /// Flip between capture and gallery
    ///
    /// Opening the gallery mounts a new generation and lists the photos;
    /// closing it tears the generation down so late results are ignored.
    pub(crate) fn handle_toggle_view(&mut self) -> Task<Message> {
        if self.show_gallery {
            self.show_gallery = false;
            self.gallery.unmount();
            info!("Gallery closed");
            Task::none()
        } else {
            self.show_gallery = true;
            let generation = self.gallery.mount();
            info!(generation = generation.value(), "Gallery opened");
            self.list_photos(generation)
        }
    }

    pub(crate) fn handle_quit(&mut self) -> Task<Message> {
        if self.gallery.mounted {
            self.gallery.unmount();
        }
        self.should_exit = true;
        Task::none()
    }
}
