// SPDX-License-Identifier: GPL-3.0-only

//! Persistent user configuration
//!
//! Stored as JSON at `<config dir>/photobooth/config.json`. A missing file
//! means defaults; a file that exists but cannot be parsed is an error so a
//! typo never silently resets the user's settings.

use crate::constants::{self, APP_ID};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema version of this file
    pub version: u64,
    /// Directory holding captured photos
    pub photos_dir: PathBuf,
    /// Directory holding pre-computed face sidecars, kept out of `photos_dir`
    pub faces_dir: PathBuf,
    /// Root of the shared photo library used by "save to gallery"
    pub library_dir: PathBuf,
    /// Side of the square gallery thumbnail, in display pixels
    pub thumbnail_size: f64,
    /// Run face detection when the gallery opens
    pub detect_faces: bool,
    /// Aspect ratio selected at startup
    pub default_ratio: String,
    /// Image replayed by the virtual camera when no source is given
    pub camera_source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: constants::config::VERSION,
            photos_dir: default_photos_dir(),
            faces_dir: default_faces_dir(),
            library_dir: default_library_dir(),
            thumbnail_size: constants::gallery::THUMBNAIL_SIZE,
            detect_faces: true,
            default_ratio: constants::capture::DEFAULT_RATIO.to_string(),
            camera_source: None,
        }
    }
}

fn app_documents_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_ID)
}

/// `~/Documents/photobooth/photos`, falling back to the home or current dir
pub fn default_photos_dir() -> PathBuf {
    app_documents_dir().join(constants::photos::DIR_NAME)
}

/// `~/Documents/photobooth/faces`
pub fn default_faces_dir() -> PathBuf {
    app_documents_dir().join(constants::photos::FACES_DIR_NAME)
}

/// `~/Pictures/photobooth`
pub fn default_library_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_ID)
}

/// Location of the config file, if the platform has a config directory
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_ID).join(constants::config::FILE_NAME))
}

impl Config {
    /// Load from the default location
    pub fn load() -> AppResult<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let raw = match std::fs::read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(AppError::Config(format!("{}: {}", path.display(), e)));
            }
        };

        let config: Config = serde_json::from_slice(&raw)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;

        if config.version != constants::config::VERSION {
            info!(
                found = config.version,
                current = constants::config::VERSION,
                "Config written by a different version"
            );
        }
        Ok(config)
    }

    /// Reject values the app cannot work with
    pub fn validate(&self) -> AppResult<()> {
        if !(self.thumbnail_size.is_finite() && self.thumbnail_size > 0.0) {
            return Err(AppError::Config(format!(
                "thumbnail_size must be a positive number, got {}",
                self.thumbnail_size
            )));
        }
        if self.default_ratio.trim().is_empty() {
            return Err(AppError::Config("default_ratio must not be empty".into()));
        }
        if self.faces_dir == self.photos_dir {
            return Err(AppError::Config("faces_dir must differ from photos_dir".into()));
        }
        Ok(())
    }
}
