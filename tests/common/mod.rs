// SPDX-License-Identifier: GPL-3.0-only

//! Fake services and helpers shared by the integration tests

#![allow(dead_code)]

use futures::future::BoxFuture;
use photobooth::app::{AppModel, Message, Runtime, Services};
use photobooth::backends::camera::{CaptureEngine, CaptureResult, CaptureSettings, CapturedImage};
use photobooth::backends::face_detection::{
    DetectedFace, DetectedImage, DetectionOptions, DetectionResult, DetectionResultOf,
    FaceBounds, FaceDetector,
};
use photobooth::backends::library::{LibraryResult, PermissionStatus, PhotoLibrary};
use photobooth::config::Config;
use photobooth::errors::{CaptureError, LibraryError};
use photobooth::storage::LocalStorage;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::Semaphore;

/// Fresh directory, removed when dropped
pub fn temp_root(label: &str) -> TempDir {
    tempfile::Builder::new()
        .prefix(&format!("photobooth-{}-", label))
        .tempdir()
        .unwrap()
}

pub fn test_config(root: &Path) -> Config {
    Config {
        photos_dir: root.join("photos"),
        faces_dir: root.join("faces"),
        library_dir: root.join("library"),
        ..Default::default()
    }
}

// =============================================================================
// Camera
// =============================================================================

/// Writes a small file per capture; can be switched to failing
pub struct FakeCamera {
    scratch: PathBuf,
    pub fail: AtomicBool,
    pub captures: AtomicUsize,
    pub last_settings: Mutex<Option<CaptureSettings>>,
}

impl FakeCamera {
    pub fn new(scratch: PathBuf) -> Self {
        std::fs::create_dir_all(&scratch).unwrap();
        Self {
            scratch,
            fail: AtomicBool::new(false),
            captures: AtomicUsize::new(0),
            last_settings: Mutex::new(None),
        }
    }
}

impl CaptureEngine for FakeCamera {
    fn name(&self) -> &str {
        "fake"
    }

    fn capture<'a>(
        &'a self,
        settings: &'a CaptureSettings,
    ) -> BoxFuture<'a, CaptureResult<CapturedImage>> {
        Box::pin(async move {
            self.captures.fetch_add(1, Ordering::SeqCst);
            *self.last_settings.lock().unwrap() = Some(settings.clone());
            if self.fail.load(Ordering::SeqCst) {
                return Err(CaptureError::CaptureFailed("sensor unplugged".into()));
            }
            let path = self.scratch.join(format!("shot_{}.jpg", uuid::Uuid::new_v4()));
            tokio::fs::write(&path, b"jpeg")
                .await
                .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;
            Ok(CapturedImage { path })
        })
    }

    fn supported_ratios(&self) -> BoxFuture<'_, CaptureResult<Vec<String>>> {
        Box::pin(async { Ok(vec!["4:3".to_string(), "16:9".to_string(), "1:1".to_string()]) })
    }
}

// =============================================================================
// Detector
// =============================================================================

/// Reports one face per photo once the gate lets it through
pub struct GatedDetector {
    gate: Semaphore,
    pub calls: AtomicUsize,
    /// Photos whose detection fails
    pub failing: Mutex<Vec<PathBuf>>,
}

impl GatedDetector {
    /// Detector whose requests complete immediately
    pub fn open() -> Self {
        let detector = Self::closed();
        detector.release();
        detector
    }

    /// Detector whose requests wait for [`GatedDetector::release`]
    pub fn closed() -> Self {
        Self {
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
            failing: Mutex::new(Vec::new()),
        }
    }

    /// Let every pending and future request through
    pub fn release(&self) {
        self.gate.close();
    }
}

impl FaceDetector for GatedDetector {
    fn detect<'a>(
        &'a self,
        path: &'a Path,
        _options: DetectionOptions,
    ) -> BoxFuture<'a, DetectionResultOf<DetectionResult>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // A closed gate fails every acquire, which is the signal to proceed
            let _ = self.gate.acquire().await;
            if self.failing.lock().unwrap().iter().any(|p| p == path) {
                return Err(photobooth::errors::DetectionError::DetectorFailed(
                    "model crashed".into(),
                ));
            }
            Ok(DetectionResult {
                image: DetectedImage {
                    path: path.to_path_buf(),
                    width: 1200,
                    height: 800,
                },
                faces: vec![DetectedFace {
                    bounds: FaceBounds::new(100.0, 200.0, 200.0, 200.0),
                    roll_angle: 0.0,
                    yaw_angle: 0.0,
                    smiling_probability: Some(0.9),
                }],
            })
        })
    }
}

// =============================================================================
// Library
// =============================================================================

/// Records every asset request; fails for configured file names
pub struct RecordingLibrary {
    pub permission: PermissionStatus,
    pub permission_requests: AtomicUsize,
    pub assets: Mutex<Vec<PathBuf>>,
    pub failing_names: Vec<String>,
}

impl RecordingLibrary {
    pub fn granted() -> Self {
        Self {
            permission: PermissionStatus::Granted,
            permission_requests: AtomicUsize::new(0),
            assets: Mutex::new(Vec::new()),
            failing_names: Vec::new(),
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: PermissionStatus::Denied,
            ..Self::granted()
        }
    }

    pub fn failing(names: &[&str]) -> Self {
        Self {
            failing_names: names.iter().map(|n| n.to_string()).collect(),
            ..Self::granted()
        }
    }

    pub fn asset_count(&self) -> usize {
        self.assets.lock().unwrap().len()
    }
}

impl PhotoLibrary for RecordingLibrary {
    fn request_permission(&self) -> BoxFuture<'_, PermissionStatus> {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        let status = self.permission;
        Box::pin(async move { status })
    }

    fn create_asset<'a>(&'a self, source: &'a Path) -> BoxFuture<'a, LibraryResult<PathBuf>> {
        Box::pin(async move {
            self.assets.lock().unwrap().push(source.to_path_buf());
            let name = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if self.failing_names.contains(&name) {
                return Err(LibraryError::AssetFailed(format!("{} rejected", name)));
            }
            Ok(PathBuf::from("/library").join(name))
        })
    }
}

// =============================================================================
// Harness
// =============================================================================

pub struct Harness {
    pub root: TempDir,
    pub model: AppModel,
    pub runtime: Runtime<Message>,
    pub camera: Arc<FakeCamera>,
    pub detector: Arc<GatedDetector>,
    pub library: Arc<RecordingLibrary>,
}

impl Harness {
    /// Start the app against fakes and let startup settle
    pub async fn start(root: TempDir, detector: GatedDetector, library: RecordingLibrary) -> Self {
        let config = test_config(root.path());
        Self::start_with_config(root, config, detector, library).await
    }

    pub async fn start_with_config(
        root: TempDir,
        config: Config,
        detector: GatedDetector,
        library: RecordingLibrary,
    ) -> Self {
        let camera = Arc::new(FakeCamera::new(root.path().join("scratch")));
        let detector = Arc::new(detector);
        let library = Arc::new(library);
        let services = Services {
            camera: camera.clone(),
            storage: Arc::new(LocalStorage),
            detector: detector.clone(),
            library: library.clone(),
        };

        let (model, startup) = AppModel::new(config, services);
        let mut harness = Self {
            root,
            model,
            runtime: Runtime::new(),
            camera,
            detector,
            library,
        };
        harness.runtime.spawn(startup);
        harness.settle().await;
        harness
    }

    pub async fn settle(&mut self) {
        self.runtime
            .run_until_idle(&mut self.model, AppModel::update)
            .await;
    }

    /// Apply `message` and drive all follow-up work to completion
    pub async fn dispatch(&mut self, message: Message) {
        let task = self.model.update(message);
        self.runtime.spawn(task);
        self.settle().await;
    }

    /// Apply `message` and only the next message it produces
    pub async fn dispatch_one_step(&mut self, message: Message) {
        let task = self.model.update(message);
        self.runtime.spawn(task);
        if let Some(next) = self.runtime.next().await {
            let task = self.model.update(next);
            self.runtime.spawn(task);
        }
    }

    pub fn photo(&self, name: &str) -> PathBuf {
        self.model.photos_dir().join(name)
    }

    /// Put a file into the photos directory
    pub fn add_photo(&self, name: &str) -> PathBuf {
        let path = self.photo(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"jpeg").unwrap();
        path
    }
}
