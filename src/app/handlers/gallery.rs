// SPDX-License-Identifier: GPL-3.0-only

//! Gallery handlers
//!
//! Every asynchronous gallery result carries the generation it was started
//! under. Results from an older generation belong to a gallery that has since
//! been closed and are dropped without touching state.

use crate::app::gallery::{
    DetectionOutcome, ExportOutcome, Generation, detect_all, export_selected,
};
use crate::app::state::{AppModel, Message, Notification};
use crate::app::task::Task;
use crate::backends::face_detection::DetectionOptions;
use crate::errors::StorageError;
use crate::storage::photo_path;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

impl AppModel {
    /// List the photos directory for the gallery mounted as `generation`
    pub(crate) fn list_photos(&self, generation: Generation) -> Task<Message> {
        let storage = Arc::clone(&self.services.storage);
        let photos_dir = self.config.photos_dir.clone();
        Task::perform(
            async move { storage.list_directory(&photos_dir).await },
            move |result| Message::PhotosListed { generation, result },
        )
    }

    pub(crate) fn handle_photos_listed(
        &mut self,
        generation: Generation,
        result: Result<Vec<String>, StorageError>,
    ) -> Task<Message> {
        if !self.gallery.is_current(generation) {
            debug!(generation = generation.value(), "Discarding stale photo listing");
            return Task::none();
        }

        let names = match result {
            Ok(names) => names,
            Err(err) => {
                warn!(error = %err, "Failed to list photos");
                self.apply_listing(Vec::new());
                self.notification =
                    Some(Notification::error(format!("Could not list photos: {}", err)));
                return Task::none();
            }
        };

        let photos: Vec<PathBuf> = names
            .iter()
            .map(|name| photo_path(&self.config.photos_dir, name))
            .collect();
        info!(count = photos.len(), "Photos listed");
        self.apply_listing(photos);

        if !self.config.detect_faces || self.gallery.photos.is_empty() {
            return Task::none();
        }

        let detector = Arc::clone(&self.services.detector);
        Task::run(
            detect_all(detector, self.gallery.photos.clone(), DetectionOptions::GALLERY),
            move |outcome| Message::FacesDetected {
                generation,
                outcome,
            },
        )
    }

    /// Replace the listing; the selection and cursor never outlive it
    fn apply_listing(&mut self, photos: Vec<PathBuf>) {
        self.gallery.selection =
            std::mem::take(&mut self.gallery.selection).retain_listed(&photos);
        self.gallery.cursor = self.gallery.cursor.min(photos.len().saturating_sub(1));
        self.gallery.photos = photos;
        self.gallery.loaded = true;
    }

    pub(crate) fn handle_faces_detected(
        &mut self,
        generation: Generation,
        outcome: DetectionOutcome,
    ) -> Task<Message> {
        if !self.gallery.is_current(generation) {
            debug!(
                generation = generation.value(),
                path = %outcome.path().display(),
                "Discarding stale face detection"
            );
            return Task::none();
        }
        self.gallery.faces = std::mem::take(&mut self.gallery.faces).merged(outcome);
        Task::none()
    }

    pub(crate) fn handle_toggle_selection(
        &mut self,
        path: PathBuf,
        selected: bool,
    ) -> Task<Message> {
        if !self.gallery.mounted {
            debug!("Selection ignored while gallery is closed");
            return Task::none();
        }
        if !self.gallery.is_listed(&path) {
            warn!(path = %path.display(), "Cannot select a photo that is not listed");
            return Task::none();
        }
        self.gallery.selection =
            std::mem::take(&mut self.gallery.selection).toggled(&path, selected);
        debug!(
            path = %path.display(),
            selected,
            total = self.gallery.selection.len(),
            "Selection toggled"
        );
        Task::none()
    }

    pub(crate) fn handle_toggle_focused_selection(&mut self) -> Task<Message> {
        let Some(path) = self.gallery.focused().cloned() else {
            return Task::none();
        };
        let selected = !self.gallery.selection.contains(&path);
        self.handle_toggle_selection(path, selected)
    }

    pub(crate) fn handle_move_cursor(&mut self, delta: isize) -> Task<Message> {
        let count = self.gallery.photos.len();
        if count == 0 {
            return Task::none();
        }
        self.gallery.cursor = self
            .gallery
            .cursor
            .saturating_add_signed(delta)
            .min(count - 1);
        Task::none()
    }

    /// Export every selected photo to the shared library
    pub(crate) fn handle_save_selected(&mut self) -> Task<Message> {
        if !self.gallery.mounted {
            debug!("Save ignored while gallery is closed");
            return Task::none();
        }
        if self.gallery.exporting {
            warn!("Export already in progress");
            return Task::none();
        }

        let generation = self.gallery.generation;
        if self.gallery.selection.is_empty() {
            return self.handle_export_finished(generation, ExportOutcome::NothingToDo);
        }

        let photos = self.gallery.selection.to_vec();
        let library = Arc::clone(&self.services.library);
        info!(count = photos.len(), "Saving selected photos to library");
        self.gallery.exporting = true;

        Task::perform(
            async move { export_selected(library.as_ref(), &photos).await },
            move |outcome| Message::ExportFinished {
                generation,
                outcome,
            },
        )
    }

    pub(crate) fn handle_export_finished(
        &mut self,
        generation: Generation,
        outcome: ExportOutcome,
    ) -> Task<Message> {
        if !self.gallery.is_current(generation) {
            info!(summary = %outcome.summary(), "Export finished after gallery closed");
            return Task::none();
        }
        self.gallery.exporting = false;

        let text = outcome.summary();
        self.notification = Some(match outcome {
            ExportOutcome::Saved { .. } => Notification::success(text),
            ExportOutcome::NothingToDo => Notification::info(text),
            ExportOutcome::PermissionDenied(_) | ExportOutcome::Failed { .. } => {
                Notification::error(text)
            }
        });
        Task::none()
    }
}
