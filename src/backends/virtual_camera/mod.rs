// SPDX-License-Identifier: GPL-3.0-only

//! Virtual camera backed by an image file
//!
//! Every capture produces a fresh copy of the source image in a scratch
//! directory, the same way a hardware engine hands back a temporary file.
//! JPEG sources are copied byte for byte; other formats are decoded and
//! re-encoded as JPEG so the photos directory only ever holds `.jpg` data.

use crate::backends::camera::{CaptureEngine, CaptureResult, CaptureSettings, CapturedImage};
use crate::errors::CaptureError;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Capture engine that replays a still image
#[derive(Debug, Clone)]
pub struct FileSourceCamera {
    source: PathBuf,
    scratch_dir: PathBuf,
    ratios: Vec<String>,
}

impl FileSourceCamera {
    /// Create a virtual camera for `source`, writing captures to the system temp dir
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            scratch_dir: std::env::temp_dir(),
            ratios: vec!["4:3".to_string(), "16:9".to_string()],
        }
    }

    /// Write captures into `dir` instead of the system temp dir
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    async fn capture_to_scratch(&self, settings: &CaptureSettings) -> CaptureResult<CapturedImage> {
        if !tokio::fs::try_exists(&self.source).await.unwrap_or(false) {
            return Err(CaptureError::CaptureFailed(format!(
                "source image {} not found",
                self.source.display()
            )));
        }

        let target = self
            .scratch_dir
            .join(format!("capture_{}.jpg", uuid::Uuid::new_v4()));

        debug!(
            source = %self.source.display(),
            target = %target.display(),
            facing = settings.facing.display_name(),
            flash = settings.flash.display_name(),
            zoom = settings.zoom,
            ratio = %settings.ratio,
            "Virtual camera capture"
        );

        if is_jpeg(&self.source) {
            tokio::fs::copy(&self.source, &target)
                .await
                .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;
        } else {
            let source = self.source.clone();
            let output = target.clone();
            tokio::task::spawn_blocking(move || -> Result<(), String> {
                let img = image::open(&source).map_err(|e| e.to_string())?;
                img.to_rgb8()
                    .save_with_format(&output, image::ImageFormat::Jpeg)
                    .map_err(|e| e.to_string())
            })
            .await
            .map_err(|e| CaptureError::CaptureFailed(format!("encoder task failed: {}", e)))?
            .map_err(CaptureError::CaptureFailed)?;
        }

        info!(path = %target.display(), "Image captured");
        Ok(CapturedImage { path: target })
    }
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg")
        })
        .unwrap_or(false)
}

impl CaptureEngine for FileSourceCamera {
    fn name(&self) -> &str {
        "file source"
    }

    fn capture<'a>(
        &'a self,
        settings: &'a CaptureSettings,
    ) -> BoxFuture<'a, CaptureResult<CapturedImage>> {
        Box::pin(self.capture_to_scratch(settings))
    }

    fn supported_ratios(&self) -> BoxFuture<'_, CaptureResult<Vec<String>>> {
        let ratios = self.ratios.clone();
        Box::pin(async move { Ok(ratios) })
    }
}
