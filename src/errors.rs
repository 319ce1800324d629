// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the camera application

use std::fmt;
use std::path::PathBuf;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Storage/filesystem errors
    Storage(StorageError),
    /// Face detection errors
    Detection(DetectionError),
    /// Configuration errors
    Config(String),
    /// Generic error with message
    Other(String),
}

/// Capture engine errors
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// The engine could not produce an image
    CaptureFailed(String),
    /// The captured image could not be moved into the photos directory
    SaveFailed(String),
}

/// File storage errors
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Directory could not be created
    CreateDirectory { path: PathBuf, reason: String },
    /// File could not be moved
    Move { from: PathBuf, to: PathBuf, reason: String },
    /// Directory could not be listed
    List { path: PathBuf, reason: String },
    /// Other I/O failure
    Io(String),
}

/// Face detection errors
#[derive(Debug, Clone)]
pub enum DetectionError {
    /// The image could not be opened or decoded
    ImageUnreadable(String),
    /// The image reports a zero width or height
    EmptyImage,
    /// The detector produced no usable result
    DetectorFailed(String),
}

/// Shared photo library errors
#[derive(Debug, Clone)]
pub enum LibraryError {
    /// Access to the library was not granted
    PermissionDenied,
    /// Creating an asset failed
    AssetFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Storage(e) => write!(f, "Storage error: {}", e),
            AppError::Detection(e) => write!(f, "Detection error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            CaptureError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::CreateDirectory { path, reason } => {
                write!(f, "Cannot create {}: {}", path.display(), reason)
            }
            StorageError::Move { from, to, reason } => write!(
                f,
                "Cannot move {} to {}: {}",
                from.display(),
                to.display(),
                reason
            ),
            StorageError::List { path, reason } => {
                write!(f, "Cannot list {}: {}", path.display(), reason)
            }
            StorageError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for DetectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionError::ImageUnreadable(msg) => write!(f, "Image unreadable: {}", msg),
            DetectionError::EmptyImage => write!(f, "Image has no pixels"),
            DetectionError::DetectorFailed(msg) => write!(f, "Detector failed: {}", msg),
        }
    }
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::PermissionDenied => write!(f, "Photo library access denied"),
            LibraryError::AssetFailed(msg) => write!(f, "Could not save asset: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for StorageError {}
impl std::error::Error for DetectionError {}
impl std::error::Error for LibraryError {}

impl From<DetectionError> for AppError {
    fn from(err: DetectionError) -> Self {
        AppError::Detection(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(StorageError::Io(err.to_string()))
    }
}

impl From<image::ImageError> for DetectionError {
    fn from(err: image::ImageError) -> Self {
        DetectionError::ImageUnreadable(err.to_string())
    }
}

impl From<StorageError> for CaptureError {
    fn from(err: StorageError) -> Self {
        CaptureError::SaveFailed(err.to_string())
    }
}
