// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function acts as a dispatcher; the handlers live in
//! the `handlers` submodules organized by screen:
//!
//! - `handlers::system`: startup, navigation, notifications
//! - `handlers::capture`: camera controls and photo capture
//! - `handlers::gallery`: listing, face detection, selection, export

use crate::app::state::{AppModel, Message};
use crate::app::task::Task;

impl AppModel {
    /// Main message handler - routes messages to the handler methods
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // ===== Navigation =====
            Message::ToggleView => self.handle_toggle_view(),
            Message::DismissNotification => {
                self.notification = None;
                Task::none()
            }
            Message::Quit => self.handle_quit(),

            // ===== Startup =====
            Message::PhotosDirectoryReady(result) => self.handle_photos_directory_ready(result),
            Message::RatiosLoaded(result) => self.handle_ratios_loaded(result),

            // ===== Capture Controls =====
            Message::ToggleFacing => self.handle_toggle_facing(),
            Message::ToggleFlash => self.handle_toggle_flash(),
            Message::ToggleWhiteBalance => self.handle_toggle_white_balance(),
            Message::ToggleAutoFocus => self.handle_toggle_auto_focus(),
            Message::ZoomIn => self.handle_zoom_in(),
            Message::ZoomOut => self.handle_zoom_out(),
            Message::SetZoom(value) => self.handle_set_zoom(value),
            Message::IncreaseFocusDepth => self.handle_adjust_focus_depth(true),
            Message::DecreaseFocusDepth => self.handle_adjust_focus_depth(false),
            Message::SetFocusDepth(value) => self.handle_set_focus_depth(value),
            Message::SetRatio(ratio) => self.handle_set_ratio(ratio),
            Message::CycleRatio => self.handle_cycle_ratio(),

            // ===== Capture =====
            Message::Capture => self.handle_capture(),
            Message::PhotoSaved(result) => self.handle_photo_saved(result),

            // ===== Gallery =====
            Message::PhotosListed { generation, result } => {
                self.handle_photos_listed(generation, result)
            }
            Message::FacesDetected {
                generation,
                outcome,
            } => self.handle_faces_detected(generation, outcome),
            Message::ToggleSelection { path, selected } => {
                self.handle_toggle_selection(path, selected)
            }
            Message::CursorUp => self.handle_move_cursor(-1),
            Message::CursorDown => self.handle_move_cursor(1),
            Message::ToggleFocusedSelection => self.handle_toggle_focused_selection(),
            Message::SaveSelected => self.handle_save_selected(),
            Message::ExportFinished {
                generation,
                outcome,
            } => self.handle_export_finished(generation, outcome),
        }
    }
}
