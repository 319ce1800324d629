// SPDX-License-Identifier: GPL-3.0-only

//! Gallery screen state
//!
//! The gallery lists the photos directory, keeps the multi-select set,
//! collects face detection results and exports selected photos.
//!
//! Asynchronous work started by the gallery is stamped with the generation
//! that was current when it started. Closing the gallery advances the
//! generation, so results that land afterwards are recognised as stale and
//! dropped instead of being applied to a torn-down screen.

pub mod detection;
pub mod export;
pub mod faces;
pub mod geometry;
pub mod selection;

pub use detection::{DetectionOutcome, detect_all};
pub use export::{ExportFailure, ExportOutcome, export_selected};
pub use faces::{FaceIndex, FaceOverlay, PhotoFaces};
pub use geometry::{ImageDimensions, OverlayRect, ThumbnailGeometry};
pub use selection::Selection;

use std::path::PathBuf;

/// Monotonic counter identifying one mounted lifetime of the gallery
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// State owned by the gallery screen
#[derive(Debug, Clone, Default)]
pub struct GalleryState {
    /// Current generation; bumped on every mount and teardown
    pub generation: Generation,
    /// Whether the gallery is currently mounted
    pub mounted: bool,
    /// Full paths of the listed photos, in storage order
    pub photos: Vec<PathBuf>,
    /// Face detection results keyed by photo path
    pub faces: FaceIndex,
    /// Checked photos; survives closing and reopening the gallery
    pub selection: Selection,
    /// Row under the cursor in the terminal front-end
    pub cursor: usize,
    /// Whether the directory listing has arrived for this generation
    pub loaded: bool,
    /// Whether an export is running
    pub exporting: bool,
}

impl GalleryState {
    /// Start a new mounted lifetime and return its generation
    pub fn mount(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.mounted = true;
        self.loaded = false;
        self.faces = FaceIndex::new();
        self.cursor = 0;
        self.exporting = false;
        self.generation
    }

    /// End the current lifetime; pending results become stale
    pub fn unmount(&mut self) {
        self.generation = self.generation.next();
        self.mounted = false;
    }

    /// Whether a result stamped with `generation` may still be applied
    pub fn is_current(&self, generation: Generation) -> bool {
        self.mounted && self.generation == generation
    }

    pub fn is_listed(&self, path: &std::path::Path) -> bool {
        self.photos.iter().any(|p| p == path)
    }

    /// Photo under the cursor
    pub fn focused(&self) -> Option<&PathBuf> {
        self.photos.get(self.cursor)
    }
}
