// SPDX-License-Identifier: GPL-3.0-only

//! Shared photo library abstraction
//!
//! The library is permission gated: callers ask for access once per export
//! and then create one asset per photo.

use crate::errors::LibraryError;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result type for library operations
pub type LibraryResult<T> = Result<T, LibraryError>;

/// Answer to a permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Device-wide photo library
pub trait PhotoLibrary: Send + Sync {
    /// Ask for write access; a previous grant is returned without prompting
    fn request_permission(&self) -> BoxFuture<'_, PermissionStatus>;

    /// Add the image at `source` to the library, returning the new asset location
    fn create_asset<'a>(&'a self, source: &'a Path) -> BoxFuture<'a, LibraryResult<PathBuf>>;
}

/// Library rooted at a plain directory (e.g. `~/Pictures/photobooth`)
///
/// Access is granted when the directory exists or can be created.
#[derive(Debug, Clone)]
pub struct DirectoryLibrary {
    root: PathBuf,
}

impl DirectoryLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn check_access(&self) -> PermissionStatus {
        match tokio::fs::create_dir_all(&self.root).await {
            Ok(()) => match tokio::fs::metadata(&self.root).await {
                Ok(meta) if meta.is_dir() && !meta.permissions().readonly() => {
                    debug!(root = %self.root.display(), "Library access granted");
                    PermissionStatus::Granted
                }
                _ => {
                    warn!(root = %self.root.display(), "Library directory is not writable");
                    PermissionStatus::Denied
                }
            },
            Err(e) => {
                warn!(root = %self.root.display(), error = %e, "Library directory unavailable");
                PermissionStatus::Denied
            }
        }
    }

    async fn copy_in(&self, source: &Path) -> LibraryResult<PathBuf> {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        let extension = source
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "jpg".to_string());

        // Assets never overwrite each other, even when the same photo is exported twice
        let target = self.root.join(format!(
            "{}_{}.{}",
            stem,
            &uuid::Uuid::new_v4().simple().to_string()[..8],
            extension
        ));

        tokio::fs::copy(source, &target)
            .await
            .map_err(|e| LibraryError::AssetFailed(format!("{}: {}", source.display(), e)))?;

        info!(source = %source.display(), asset = %target.display(), "Asset created");
        Ok(target)
    }
}

impl PhotoLibrary for DirectoryLibrary {
    fn request_permission(&self) -> BoxFuture<'_, PermissionStatus> {
        Box::pin(self.check_access())
    }

    fn create_asset<'a>(&'a self, source: &'a Path) -> BoxFuture<'a, LibraryResult<PathBuf>> {
        Box::pin(self.copy_in(source))
    }
}
