// SPDX-License-Identifier: GPL-3.0-only

//! Bulk export of selected photos to the shared photo library

use crate::backends::library::{PermissionStatus, PhotoLibrary};
use crate::errors::LibraryError;
use futures::future::join_all;
use std::path::PathBuf;
use tracing::{info, warn};

/// A photo that could not be exported
#[derive(Debug, Clone)]
pub struct ExportFailure {
    pub path: PathBuf,
    pub error: LibraryError,
}

/// Aggregate result of one "save selected" action
#[derive(Debug, Clone)]
pub enum ExportOutcome {
    /// Selection was empty; no library call was made
    NothingToDo,
    /// Library access was refused
    PermissionDenied(LibraryError),
    /// Every selected photo was exported
    Saved { count: usize },
    /// At least one export failed; all exports were still awaited
    Failed {
        saved: usize,
        failures: Vec<ExportFailure>,
    },
}

impl ExportOutcome {
    /// One-line message for the user
    pub fn summary(&self) -> String {
        match self {
            ExportOutcome::NothingToDo => "No photos to save!".to_string(),
            ExportOutcome::PermissionDenied(error) => format!("Could not save photos: {}", error),
            ExportOutcome::Saved { count } => {
                format!("Successfully saved {} photo(s) to the photo library!", count)
            }
            ExportOutcome::Failed { saved, failures } => {
                let names = failures
                    .iter()
                    .map(|f| {
                        f.path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_else(|| f.path.display().to_string())
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "Saved {} photo(s), {} failed: {}",
                    saved,
                    failures.len(),
                    names
                )
            }
        }
    }
}

/// Export `photos` to `library`
///
/// Asks for permission first, then runs one export per photo concurrently
/// and waits for all of them before reporting.
pub async fn export_selected(library: &dyn PhotoLibrary, photos: &[PathBuf]) -> ExportOutcome {
    if photos.is_empty() {
        info!("Export requested with empty selection");
        return ExportOutcome::NothingToDo;
    }

    if library.request_permission().await == PermissionStatus::Denied {
        warn!("Photo library permission denied");
        return ExportOutcome::PermissionDenied(LibraryError::PermissionDenied);
    }

    let results = join_all(photos.iter().map(|path| library.create_asset(path))).await;

    let mut saved = 0;
    let mut failures = Vec::new();
    for (path, result) in photos.iter().zip(results) {
        match result {
            Ok(_) => saved += 1,
            Err(error) => {
                warn!(path = %path.display(), error = %error, "Export failed");
                failures.push(ExportFailure {
                    path: path.clone(),
                    error,
                });
            }
        }
    }

    if failures.is_empty() {
        info!(count = saved, "Exported photos to library");
        ExportOutcome::Saved { count: saved }
    } else {
        ExportOutcome::Failed { saved, failures }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use std::path::Path;
    use std::sync::Mutex;

    struct RecordingLibrary {
        permission: PermissionStatus,
        calls: Mutex<Vec<PathBuf>>,
    }

    impl RecordingLibrary {
        fn new(permission: PermissionStatus) -> Self {
            Self {
                permission,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl PhotoLibrary for RecordingLibrary {
        fn request_permission(&self) -> BoxFuture<'_, PermissionStatus> {
            let status = self.permission;
            Box::pin(async move { status })
        }

        fn create_asset<'a>(
            &'a self,
            source: &'a Path,
        ) -> BoxFuture<'a, Result<PathBuf, LibraryError>> {
            Box::pin(async move {
                self.calls.lock().unwrap().push(source.to_path_buf());
                if source.to_string_lossy().contains("bad") {
                    Err(LibraryError::AssetFailed("disk full".into()))
                } else {
                    Ok(source.to_path_buf())
                }
            })
        }
    }

    #[tokio::test]
    async fn test_empty_selection_makes_no_calls() {
        let library = RecordingLibrary::new(PermissionStatus::Granted);
        let outcome = export_selected(&library, &[]).await;
        assert!(matches!(outcome, ExportOutcome::NothingToDo));
        assert!(library.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_denied_permission_is_not_success() {
        let library = RecordingLibrary::new(PermissionStatus::Denied);
        let outcome = export_selected(&library, &[PathBuf::from("/p/Photo_1.jpg")]).await;
        assert!(matches!(
            outcome,
            ExportOutcome::PermissionDenied(LibraryError::PermissionDenied)
        ));
        assert_eq!(
            outcome.summary(),
            "Could not save photos: Photo library access denied"
        );
        assert!(library.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_failure_names_failed_items() {
        let library = RecordingLibrary::new(PermissionStatus::Granted);
        let photos = vec![
            PathBuf::from("/p/Photo_1.jpg"),
            PathBuf::from("/p/bad_2.jpg"),
            PathBuf::from("/p/Photo_3.jpg"),
        ];
        let outcome = export_selected(&library, &photos).await;

        // Every export is attempted even though one fails
        assert_eq!(library.calls.lock().unwrap().len(), 3);
        match &outcome {
            ExportOutcome::Failed { saved, failures } => {
                assert_eq!(*saved, 2);
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].path, PathBuf::from("/p/bad_2.jpg"));
            }
            other => panic!("Expected Failed, got {:?}", other),
        }
        assert!(outcome.summary().contains("bad_2.jpg"));
    }

    #[tokio::test]
    async fn test_all_saved() {
        let library = RecordingLibrary::new(PermissionStatus::Granted);
        let outcome = export_selected(&library, &[PathBuf::from("/p/Photo_1.jpg")]).await;
        assert!(matches!(outcome, ExportOutcome::Saved { count: 1 }));
    }
}
