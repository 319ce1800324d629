// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Application identifier used for config, cache and data directories
pub const APP_ID: &str = "photobooth";

/// Capture control constants
pub mod capture {
    /// Increment applied by a single zoom in/out step
    pub const ZOOM_STEP: f64 = 0.1;

    /// Increment applied by a single focus nearer/farther step
    pub const FOCUS_STEP: f64 = 0.1;

    /// Lower bound for zoom and focus depth
    pub const NORMALIZED_MIN: f64 = 0.0;

    /// Upper bound for zoom and focus depth
    pub const NORMALIZED_MAX: f64 = 1.0;

    /// Aspect ratio used until the user picks another one
    pub const DEFAULT_RATIO: &str = "16:9";
}

/// Photo file naming
pub mod photos {
    /// Name of the photos subdirectory inside the documents directory
    pub const DIR_NAME: &str = "photos";

    /// Filename prefix for captured photos (`Photo_<id>.jpg`)
    pub const FILE_PREFIX: &str = "Photo_";

    /// Filename extension for captured photos
    pub const FILE_EXTENSION: &str = "jpg";

    /// First id handed out in an empty photos directory
    pub const FIRST_ID: u32 = 1;

    /// Name of the face sidecar directory, a sibling of the photos directory
    pub const FACES_DIR_NAME: &str = "faces";

    /// Suffix appended to a photo's file name to name its face sidecar
    pub const FACES_SIDECAR_SUFFIX: &str = ".faces.json";
}

/// Gallery presentation constants
pub mod gallery {
    /// Side length of the square thumbnail box, in display pixels
    pub const THUMBNAIL_SIZE: f64 = 150.0;
}

/// Configuration file constants
pub mod config {
    /// Current configuration schema version
    pub const VERSION: u64 = 1;

    /// Configuration file name inside the app config directory
    pub const FILE_NAME: &str = "config.json";
}

/// Terminal front-end constants
pub mod terminal {
    use std::time::Duration;

    /// How long to wait for a key press before redrawing
    pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

    /// Log file written while the terminal owns the screen
    pub const LOG_FILE_NAME: &str = "photobooth.log";
}

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_divide_range() {
        let steps = (capture::NORMALIZED_MAX - capture::NORMALIZED_MIN) / capture::ZOOM_STEP;
        assert!((steps - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_version_not_empty() {
        assert!(!app_info::version().is_empty());
    }
}
