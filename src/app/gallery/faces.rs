// SPDX-License-Identifier: GPL-3.0-only

//! Per-photo face detection results
//!
//! Detection outcomes arrive one at a time and in any order. Each one is
//! folded into the index by value, so partially populated indexes are always
//! consistent and a photo without an entry simply has no overlay yet.

use super::detection::DetectionOutcome;
use super::geometry::{ImageDimensions, OverlayRect, ThumbnailGeometry};
use crate::backends::face_detection::DetectedFace;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Faces found in one photo, plus its native size
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoFaces {
    pub dimensions: ImageDimensions,
    pub faces: Vec<DetectedFace>,
}

/// A face ready to draw on top of a thumbnail
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceOverlay {
    pub rect: OverlayRect,
    pub roll_angle: f64,
    pub yaw_angle: f64,
    pub smiling_probability: Option<f64>,
}

/// Detection state of every photo in the gallery
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceIndex {
    detected: BTreeMap<PathBuf, PhotoFaces>,
    failed: BTreeMap<PathBuf, String>,
}

impl FaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one detection outcome into the index
    ///
    /// A later outcome for the same photo replaces the earlier one.
    #[must_use]
    pub fn merged(mut self, outcome: DetectionOutcome) -> Self {
        match outcome {
            DetectionOutcome::Detected { path, result } => {
                match ImageDimensions::new(result.image.width, result.image.height) {
                    Some(dimensions) => {
                        self.failed.remove(&path);
                        self.detected.insert(
                            path,
                            PhotoFaces {
                                dimensions,
                                faces: result.faces,
                            },
                        );
                    }
                    None => {
                        self.detected.remove(&path);
                        self.failed.insert(
                            path,
                            format!(
                                "detector reported {}x{} image",
                                result.image.width, result.image.height
                            ),
                        );
                    }
                }
            }
            DetectionOutcome::Failed { path, error } => {
                self.detected.remove(&path);
                self.failed.insert(path, error.to_string());
            }
        }
        self
    }

    pub fn get(&self, path: &Path) -> Option<&PhotoFaces> {
        self.detected.get(path)
    }

    /// Failure message recorded for `path`, if its detection failed
    pub fn failure(&self, path: &Path) -> Option<&str> {
        self.failed.get(path).map(String::as_str)
    }

    /// Number of photos with a successful detection
    pub fn detected_count(&self) -> usize {
        self.detected.len()
    }

    /// Number of photos whose detection failed
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Overlays for `path` in the display space of a `box_size` thumbnail
    ///
    /// Empty when the photo has no detection yet, failed, or has no faces.
    pub fn overlays(&self, path: &Path, box_size: f64) -> Vec<FaceOverlay> {
        let Some(entry) = self.detected.get(path) else {
            return Vec::new();
        };
        let geometry = ThumbnailGeometry::fit(entry.dimensions, box_size);
        entry
            .faces
            .iter()
            .map(|face| FaceOverlay {
                rect: geometry.map(&face.bounds),
                roll_angle: face.roll_angle,
                yaw_angle: face.yaw_angle,
                smiling_probability: face.smiling_probability,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::face_detection::{DetectedImage, DetectionResult, FaceBounds};
    use crate::errors::DetectionError;

    fn detected(path: &str, width: u32, height: u32, faces: Vec<DetectedFace>) -> DetectionOutcome {
        DetectionOutcome::Detected {
            path: PathBuf::from(path),
            result: DetectionResult {
                image: DetectedImage {
                    path: PathBuf::from(path),
                    width,
                    height,
                },
                faces,
            },
        }
    }

    fn face(x: f64, y: f64, w: f64, h: f64) -> DetectedFace {
        DetectedFace {
            bounds: FaceBounds::new(x, y, w, h),
            smiling_probability: Some(0.8),
            ..Default::default()
        }
    }

    #[test]
    fn test_overlays_use_thumbnail_space() {
        let index = FaceIndex::new().merged(detected(
            "/p/Photo_1.jpg",
            1200,
            800,
            vec![face(100.0, 100.0, 50.0, 50.0)],
        ));

        let overlays = index.overlays(Path::new("/p/Photo_1.jpg"), 150.0);
        assert_eq!(overlays.len(), 1);
        assert_eq!(
            overlays[0].rect,
            OverlayRect {
                left: 12.5,
                top: 37.5,
                width: 6.25,
                height: 6.25
            }
        );
        assert_eq!(overlays[0].smiling_probability, Some(0.8));
    }

    #[test]
    fn test_partial_population() {
        let index = FaceIndex::new()
            .merged(detected("/p/Photo_2.jpg", 10, 10, vec![face(0.0, 0.0, 1.0, 1.0)]))
            .merged(DetectionOutcome::Failed {
                path: PathBuf::from("/p/Photo_3.jpg"),
                error: DetectionError::DetectorFailed("timeout".into()),
            });

        assert_eq!(index.detected_count(), 1);
        assert_eq!(index.failed_count(), 1);
        assert!(index.overlays(Path::new("/p/Photo_1.jpg"), 150.0).is_empty());
        assert!(index.overlays(Path::new("/p/Photo_3.jpg"), 150.0).is_empty());
        assert!(index.failure(Path::new("/p/Photo_3.jpg")).unwrap().contains("timeout"));
    }

    #[test]
    fn test_zero_sized_image_recorded_as_failure() {
        let faces = vec![face(0.0, 0.0, 1.0, 1.0)];
        let index = FaceIndex::new().merged(detected("/p/Photo_4.jpg", 0, 10, faces));
        assert!(index.get(Path::new("/p/Photo_4.jpg")).is_none());
        assert!(index.failure(Path::new("/p/Photo_4.jpg")).is_some());
    }
}
