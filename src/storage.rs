// SPDX-License-Identifier: GPL-3.0-only

//! Storage utilities for managing photo files

use crate::constants::photos::{FILE_EXTENSION, FILE_PREFIX, FIRST_ID};
use crate::errors::StorageError;
use futures::future::BoxFuture;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Outcome of an idempotent directory creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryStatus {
    /// The directory did not exist and was created
    Created,
    /// The directory was already there; not an error
    AlreadyExists,
}

/// File storage interface used by capture and gallery
pub trait FileStorage: Send + Sync {
    /// Create a directory, tolerating one that already exists
    fn create_directory<'a>(
        &'a self,
        path: &'a Path,
    ) -> BoxFuture<'a, StorageResult<DirectoryStatus>>;

    /// Move a file, replacing any file already at `to`
    fn move_file<'a>(&'a self, from: &'a Path, to: &'a Path) -> BoxFuture<'a, StorageResult<()>>;

    /// List the entry names of a directory in storage order
    fn list_directory<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, StorageResult<Vec<String>>>;
}

/// Local filesystem storage on top of `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    async fn create(path: &Path) -> StorageResult<DirectoryStatus> {
        match tokio::fs::create_dir(path).await {
            Ok(()) => {
                info!(path = %path.display(), "Directory created");
                Ok(DirectoryStatus::Created)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "Directory exists");
                Ok(DirectoryStatus::AlreadyExists)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // Missing parents: fall back to recursive creation
                tokio::fs::create_dir_all(path)
                    .await
                    .map_err(|e| StorageError::CreateDirectory {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    })?;
                info!(path = %path.display(), "Directory created with parents");
                Ok(DirectoryStatus::Created)
            }
            Err(e) => Err(StorageError::CreateDirectory {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    async fn relocate(from: &Path, to: &Path) -> StorageResult<()> {
        let move_error = |e: std::io::Error| StorageError::Move {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            reason: e.to_string(),
        };

        match tokio::fs::rename(from, to).await {
            Ok(()) => Ok(()),
            // Cross-device moves need a copy + delete
            Err(e) if e.kind() == ErrorKind::CrossesDevices => {
                tokio::fs::copy(from, to).await.map_err(move_error)?;
                tokio::fs::remove_file(from).await.map_err(move_error)?;
                Ok(())
            }
            Err(e) => Err(move_error(e)),
        }
    }

    async fn list(path: &Path) -> StorageResult<Vec<String>> {
        let list_error = |e: std::io::Error| StorageError::List {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let mut entries = tokio::fs::read_dir(path).await.map_err(list_error)?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(list_error)? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}

impl FileStorage for LocalStorage {
    fn create_directory<'a>(
        &'a self,
        path: &'a Path,
    ) -> BoxFuture<'a, StorageResult<DirectoryStatus>> {
        Box::pin(Self::create(path))
    }

    fn move_file<'a>(&'a self, from: &'a Path, to: &'a Path) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(Self::relocate(from, to))
    }

    fn list_directory<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, StorageResult<Vec<String>>> {
        Box::pin(Self::list(path))
    }
}

/// File name for the photo with the given id, e.g. `Photo_3.jpg`
pub fn photo_file_name(id: u32) -> String {
    format!("{}{}.{}", FILE_PREFIX, id, FILE_EXTENSION)
}

/// Parse the id out of a `Photo_<id>.jpg` file name
pub fn parse_photo_id(name: &str) -> Option<u32> {
    name.strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_EXTENSION)?
        .strip_suffix('.')?
        .parse()
        .ok()
}

/// First id that does not collide with any `Photo_<id>.jpg` in `names`
pub fn next_photo_id<S: AsRef<str>>(names: &[S]) -> u32 {
    names
        .iter()
        .filter_map(|name| parse_photo_id(name.as_ref()))
        .max()
        .map(|max| max.saturating_add(1))
        .unwrap_or(FIRST_ID)
}

/// Full path of a listed photo
pub fn photo_path(photos_dir: &Path, name: &str) -> PathBuf {
    photos_dir.join(name)
}
