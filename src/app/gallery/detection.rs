// SPDX-License-Identifier: GPL-3.0-only

//! Concurrent per-photo face detection
//!
//! One detector request is issued per photo. Requests run independently and
//! their outcomes are yielded in completion order, so a slow photo never holds
//! back the overlays of the others.

use crate::backends::face_detection::{DetectionOptions, DetectionResult, FaceDetector};
use crate::errors::DetectionError;
use futures::stream::{FuturesUnordered, Stream, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of one photo's detection request
#[derive(Debug, Clone)]
pub enum DetectionOutcome {
    /// Detector answered for `path`
    Detected {
        path: PathBuf,
        result: DetectionResult,
    },
    /// Detector failed for `path`; the photo simply gets no overlay
    Failed { path: PathBuf, error: DetectionError },
}

impl DetectionOutcome {
    pub fn path(&self) -> &Path {
        match self {
            DetectionOutcome::Detected { path, .. } | DetectionOutcome::Failed { path, .. } => path,
        }
    }
}

/// Run one detection per path and yield outcomes as they complete
pub fn detect_all(
    detector: Arc<dyn FaceDetector>,
    paths: Vec<PathBuf>,
    options: DetectionOptions,
) -> impl Stream<Item = DetectionOutcome> + Send + 'static {
    async_stream::stream! {
        let mut pending = paths
            .into_iter()
            .map(|path| {
                let detector = Arc::clone(&detector);
                async move {
                    let result = detector.detect(&path, options).await;
                    match result {
                        Ok(result) => DetectionOutcome::Detected { path, result },
                        Err(error) => DetectionOutcome::Failed { path, error },
                    }
                }
            })
            .collect::<FuturesUnordered<_>>();

        while let Some(outcome) = pending.next().await {
            match &outcome {
                DetectionOutcome::Detected { path, result } => {
                    debug!(
                        path = %path.display(),
                        faces = result.faces.len(),
                        "Detection finished"
                    );
                }
                DetectionOutcome::Failed { path, error } => {
                    warn!(path = %path.display(), error = %error, "Face detection failed");
                }
            }
            yield outcome;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::face_detection::{DetectedFace, DetectedImage, FaceBounds};
    use futures::future::BoxFuture;
    use std::time::Duration;

    /// Detector whose latency is encoded in the file name: `slow_*` waits longer
    struct TimedDetector;

    impl FaceDetector for TimedDetector {
        fn detect<'a>(
            &'a self,
            path: &'a Path,
            _options: DetectionOptions,
        ) -> BoxFuture<'a, Result<DetectionResult, DetectionError>> {
            Box::pin(async move {
                let name = path.file_name().unwrap().to_string_lossy().into_owned();
                if name.starts_with("slow") {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
                if name.starts_with("broken") {
                    return Err(DetectionError::DetectorFailed("boom".into()));
                }
                Ok(DetectionResult {
                    image: DetectedImage {
                        path: path.to_path_buf(),
                        width: 100,
                        height: 50,
                    },
                    faces: vec![DetectedFace {
                        bounds: FaceBounds::new(1.0, 2.0, 3.0, 4.0),
                        ..Default::default()
                    }],
                })
            })
        }
    }

    #[tokio::test]
    async fn test_outcomes_arrive_in_completion_order() {
        let paths = vec![
            PathBuf::from("/p/slow_1.jpg"),
            PathBuf::from("/p/fast_2.jpg"),
            PathBuf::from("/p/broken_3.jpg"),
        ];
        let outcomes: Vec<_> = detect_all(Arc::new(TimedDetector), paths, DetectionOptions::GALLERY)
            .collect()
            .await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes.last().unwrap().path(), Path::new("/p/slow_1.jpg"));
        let failures: Vec<_> = outcomes
            .iter()
            .filter(|o| matches!(o, DetectionOutcome::Failed { .. }))
            .collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].path(), Path::new("/p/broken_3.jpg"));
    }

    #[tokio::test]
    async fn test_empty_listing_yields_nothing() {
        let outcomes: Vec<_> =
            detect_all(Arc::new(TimedDetector), Vec::new(), DetectionOptions::GALLERY)
                .collect()
                .await;
        assert!(outcomes.is_empty());
    }
}
