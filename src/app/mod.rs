// SPDX-License-Identifier: GPL-3.0-only

//! Application coordinator
//!
//! [`AppModel`] owns the capture and gallery screens and is driven by
//! [`Message`]s. Every handler returns a [`Task`] describing the asynchronous
//! work it wants done; the [`runtime`] executes tasks and feeds their
//! messages back into [`AppModel::update`].
//!
//! ```text
//!  Message ──▶ AppModel::update ──▶ Task ──▶ Runtime (tokio)
//!     ▲                                          │
//!     └──────────────── messages ◀───────────────┘
//! ```

pub mod gallery;
pub mod handlers;
pub mod runtime;
pub mod state;
pub mod task;
pub mod update;

pub use runtime::Runtime;
pub use state::{
    AppModel, CaptureState, Message, Notification, NotificationKind, PhotoRecord, Services,
};
pub use task::Task;

use crate::backends::camera::CaptureSettings;
use crate::backends::face_detection::SidecarFaceDetector;
use crate::backends::library::DirectoryLibrary;
use crate::backends::virtual_camera::FileSourceCamera;
use crate::config::Config;
use crate::storage::{FileStorage, LocalStorage};
use gallery::GalleryState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

impl Services {
    /// File-backed services: virtual camera, local disk, sidecar detector, directory library
    pub fn local(config: &Config, camera_source: PathBuf) -> Self {
        Self {
            camera: Arc::new(FileSourceCamera::new(camera_source)),
            storage: Arc::new(LocalStorage),
            detector: Arc::new(SidecarFaceDetector::new(config.faces_dir.clone())),
            library: Arc::new(DirectoryLibrary::new(config.library_dir.clone())),
        }
    }
}

/// Create the photos directory and list it
///
/// "Already exists" is the normal case after the first run.
pub async fn prepare_photos_directory(
    storage: Arc<dyn FileStorage>,
    photos_dir: PathBuf,
) -> Result<Vec<String>, crate::errors::StorageError> {
    let status = storage.create_directory(&photos_dir).await?;
    info!(path = %photos_dir.display(), ?status, "Photos directory ready");
    storage.list_directory(&photos_dir).await
}

impl AppModel {
    /// Build the model and the startup task
    pub fn new(config: Config, services: Services) -> (Self, Task<Message>) {
        let settings = CaptureSettings::with_ratio(config.default_ratio.clone());
        let model = Self {
            capture: CaptureState::new(settings),
            gallery: GalleryState::default(),
            show_gallery: false,
            notification: None,
            should_exit: false,
            config,
            services,
        };

        let storage = Arc::clone(&model.services.storage);
        let photos_dir = model.config.photos_dir.clone();
        let camera = Arc::clone(&model.services.camera);

        let startup = Task::batch([
            Task::perform(
                prepare_photos_directory(storage, photos_dir),
                Message::PhotosDirectoryReady,
            ),
            Task::perform(
                async move { camera.supported_ratios().await },
                Message::RatiosLoaded,
            ),
        ]);

        (model, startup)
    }

    /// Directory photos are written to and listed from
    pub fn photos_dir(&self) -> &std::path::Path {
        &self.config.photos_dir
    }
}
