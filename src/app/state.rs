// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::app::gallery::{DetectionOutcome, ExportOutcome, GalleryState, Generation};
use crate::backends::camera::{CaptureEngine, CaptureSettings};
use crate::backends::face_detection::FaceDetector;
use crate::backends::library::PhotoLibrary;
use crate::config::Config;
use crate::constants::photos::FIRST_ID;
use crate::errors::{CaptureError, StorageError};
use crate::storage::FileStorage;
use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::sync::Arc;

/// A photo persisted by this session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRecord {
    /// Sequential id, also encoded in the file name
    pub id: u32,
    /// Final location inside the photos directory
    pub path: PathBuf,
    pub captured_at: DateTime<Local>,
}

/// External services the app drives
#[derive(Clone)]
pub struct Services {
    pub camera: Arc<dyn CaptureEngine>,
    pub storage: Arc<dyn FileStorage>,
    pub detector: Arc<dyn FaceDetector>,
    pub library: Arc<dyn PhotoLibrary>,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Services {{ camera: {} }}", self.camera.name())
    }
}

/// Capture screen state
#[derive(Debug, Clone)]
pub struct CaptureState {
    /// Settings applied to the preview and every capture
    pub settings: CaptureSettings,
    /// Ratios reported by the engine; empty until known
    pub supported_ratios: Vec<String>,
    /// Id given to the next successful capture
    pub next_photo_id: u32,
    /// A capture is in flight
    pub is_capturing: bool,
    /// Photos directory exists and ids are seeded
    pub directory_ready: bool,
    /// Most recent successful capture
    pub last_photo: Option<PhotoRecord>,
    /// Successful captures in this session
    pub photos_taken: u32,
}

impl CaptureState {
    pub fn new(settings: CaptureSettings) -> Self {
        Self {
            settings,
            supported_ratios: Vec::new(),
            next_photo_id: FIRST_ID,
            is_capturing: false,
            directory_ready: false,
            last_photo: None,
            photos_taken: 0,
        }
    }
}

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// Message shown to the user until dismissed or replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: text.into(),
        }
    }
}

/// The application model
///
/// Owns both screens; `show_gallery` decides which one is active.
pub struct AppModel {
    pub config: Config,
    pub services: Services,
    pub show_gallery: bool,
    pub capture: CaptureState,
    pub gallery: GalleryState,
    pub notification: Option<Notification>,
    pub should_exit: bool,
}

impl std::fmt::Debug for AppModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppModel")
            .field("show_gallery", &self.show_gallery)
            .field("capture", &self.capture)
            .field("gallery", &self.gallery)
            .field("notification", &self.notification)
            .finish_non_exhaustive()
    }
}

/// Messages driving the update loop
#[derive(Debug, Clone)]
pub enum Message {
    // ===== Navigation =====
    /// Switch between capture and gallery screens
    ToggleView,
    DismissNotification,
    Quit,

    // ===== Startup =====
    /// Photos directory prepared; carries its listing for id seeding
    PhotosDirectoryReady(Result<Vec<String>, StorageError>),
    RatiosLoaded(Result<Vec<String>, CaptureError>),

    // ===== Capture Controls =====
    ToggleFacing,
    ToggleFlash,
    ToggleWhiteBalance,
    ToggleAutoFocus,
    ZoomIn,
    ZoomOut,
    SetZoom(f64),
    IncreaseFocusDepth,
    DecreaseFocusDepth,
    SetFocusDepth(f64),
    SetRatio(String),
    /// Advance to the next supported ratio
    CycleRatio,

    // ===== Capture =====
    Capture,
    PhotoSaved(Result<PhotoRecord, CaptureError>),

    // ===== Gallery =====
    PhotosListed {
        generation: Generation,
        result: Result<Vec<String>, StorageError>,
    },
    FacesDetected {
        generation: Generation,
        outcome: DetectionOutcome,
    },
    ToggleSelection {
        path: PathBuf,
        selected: bool,
    },
    CursorUp,
    CursorDown,
    /// Flip the selection of the photo under the cursor
    ToggleFocusedSelection,
    SaveSelected,
    ExportFinished {
        generation: Generation,
        outcome: ExportOutcome,
    },
}
