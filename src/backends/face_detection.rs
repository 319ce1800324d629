// SPDX-License-Identifier: GPL-3.0-only

//! Face detector abstraction
//!
//! Detectors report faces in native pixel space of the analysed image, along
//! with the image's native dimensions so the gallery can map the bounds onto
//! a scaled thumbnail.
//!
//! [`SidecarFaceDetector`] consumes detector output that was written ahead of
//! time into a faces directory kept apart from the photos
//! (`faces/Photo_1.jpg.faces.json`), so the gallery can run without an
//! on-device detection engine.

use crate::constants::photos::FACES_SIDECAR_SUFFIX;
use crate::errors::DetectionError;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Result type for detector operations
pub type DetectionResultOf<T> = Result<T, DetectionError>;

/// A point in native pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A size in native pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned face bounding box in native pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceBounds {
    pub origin: Point,
    pub size: Size,
}

impl FaceBounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }
}

/// One face reported by the detector
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedFace {
    pub bounds: FaceBounds,
    /// Head rotation around the axis pointing out of the image, in degrees
    #[serde(default)]
    pub roll_angle: f64,
    /// Head rotation around the vertical axis, in degrees
    #[serde(default)]
    pub yaw_angle: f64,
    /// Present only when classifications were requested
    #[serde(default)]
    pub smiling_probability: Option<f64>,
}

/// Detector request options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionOptions {
    pub detect_landmarks: bool,
    pub run_classifications: bool,
}

impl DetectionOptions {
    /// Options used by the gallery: no landmarks, all classifications
    pub const GALLERY: DetectionOptions = DetectionOptions {
        detect_landmarks: false,
        run_classifications: true,
    };
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self::GALLERY
    }
}

/// Native metadata of the analysed image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Detector output for one image
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    pub image: DetectedImage,
    pub faces: Vec<DetectedFace>,
}

/// Face detector interface
pub trait FaceDetector: Send + Sync {
    /// Detect faces in the image at `path`
    fn detect<'a>(
        &'a self,
        path: &'a Path,
        options: DetectionOptions,
    ) -> BoxFuture<'a, DetectionResultOf<DetectionResult>>;
}

/// On-disk detector output format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaceSidecar {
    #[serde(default)]
    pub faces: Vec<DetectedFace>,
}

/// Path of the sidecar in `faces_dir` that belongs to `image`
pub fn sidecar_path(faces_dir: &Path, image: &Path) -> PathBuf {
    let mut name = image
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(FACES_SIDECAR_SUFFIX);
    faces_dir.join(name)
}

/// Detector that reads pre-computed faces from JSON sidecar files
#[derive(Debug, Clone)]
pub struct SidecarFaceDetector {
    faces_dir: PathBuf,
}

impl SidecarFaceDetector {
    pub fn new(faces_dir: impl Into<PathBuf>) -> Self {
        Self {
            faces_dir: faces_dir.into(),
        }
    }

    async fn run(
        &self,
        path: &Path,
        options: DetectionOptions,
    ) -> DetectionResultOf<DetectionResult> {
        let image_path = path.to_path_buf();
        let (width, height) =
            tokio::task::spawn_blocking(move || image::image_dimensions(&image_path))
                .await
                .map_err(|e| {
                    DetectionError::DetectorFailed(format!("dimension task failed: {}", e))
                })??;

        if width == 0 || height == 0 {
            return Err(DetectionError::EmptyImage);
        }

        let sidecar = sidecar_path(&self.faces_dir, path);
        let raw = tokio::fs::read(&sidecar).await.map_err(|e| {
            DetectionError::DetectorFailed(format!("{}: {}", sidecar.display(), e))
        })?;
        let parsed: FaceSidecar = serde_json::from_slice(&raw).map_err(|e| {
            DetectionError::DetectorFailed(format!("{}: {}", sidecar.display(), e))
        })?;

        let faces = parsed
            .faces
            .into_iter()
            .map(|mut face| {
                if !options.run_classifications {
                    face.smiling_probability = None;
                }
                face
            })
            .collect::<Vec<_>>();

        trace!(path = %path.display(), landmarks = options.detect_landmarks, "Sidecar parsed");
        debug!(path = %path.display(), width, height, faces = faces.len(), "Faces detected");

        Ok(DetectionResult {
            image: DetectedImage {
                path: path.to_path_buf(),
                width,
                height,
            },
            faces,
        })
    }
}

impl FaceDetector for SidecarFaceDetector {
    fn detect<'a>(
        &'a self,
        path: &'a Path,
        options: DetectionOptions,
    ) -> BoxFuture<'a, DetectionResultOf<DetectionResult>> {
        Box::pin(self.run(path, options))
    }
}
