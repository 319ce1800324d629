// SPDX-License-Identifier: GPL-3.0-only

//! Multi-select state for the gallery
//!
//! Updates consume the old selection and return the new one, so a selection
//! held by the model can never be modified behind its back.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Set of checked photos, keyed by full path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    paths: BTreeSet<PathBuf>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (`selected == true`) or remove `path`
    ///
    /// Selecting an already selected path keeps a single entry.
    #[must_use]
    pub fn toggled(mut self, path: &Path, selected: bool) -> Self {
        if selected {
            self.paths.insert(path.to_path_buf());
        } else {
            self.paths.remove(path);
        }
        self
    }

    /// Drop every path that is not part of `listing`
    #[must_use]
    pub fn retain_listed(mut self, listing: &[PathBuf]) -> Self {
        self.paths.retain(|path| listing.contains(path));
        self
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    /// Owned copy of the selected paths, in path order
    pub fn to_vec(&self) -> Vec<PathBuf> {
        self.paths.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_select_keeps_one_entry() {
        let path = Path::new("/photos/Photo_1.jpg");
        let selection = Selection::new().toggled(path, true).toggled(path, true);
        assert_eq!(selection.len(), 1);
        assert!(selection.contains(path));
    }

    #[test]
    fn test_deselect_removes() {
        let a = Path::new("/photos/Photo_1.jpg");
        let b = Path::new("/photos/Photo_2.jpg");
        let selection = Selection::new()
            .toggled(a, true)
            .toggled(b, true)
            .toggled(a, false);
        assert_eq!(selection.to_vec(), vec![b.to_path_buf()]);

        // Deselecting an unselected path is a no-op
        let selection = selection.toggled(a, false);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_retain_listed() {
        let a = PathBuf::from("/photos/Photo_1.jpg");
        let b = PathBuf::from("/photos/Photo_2.jpg");
        let selection = Selection::new()
            .toggled(&a, true)
            .toggled(&b, true)
            .retain_listed(std::slice::from_ref(&b));
        assert!(!selection.contains(&a));
        assert!(selection.contains(&b));
    }
}
