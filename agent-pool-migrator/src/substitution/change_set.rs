//! Change set of modified candidate files.

use super::SubstitutionError;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Working-tree relative paths of files with at least one successful replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    files: BTreeSet<PathBuf>,
}

impl ChangeSet {
    /// Records a modified file.
    pub fn insert(&mut self, path: PathBuf) {
        self.files.insert(path);
    }

    /// Returns true if no file was modified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of modified files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if the given path was modified.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    /// Iterates modified paths in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }
}

/// Outcome of one substitution pass over a working tree.
#[derive(Debug, Default)]
pub struct SubstitutionReport {
    /// Files that were changed.
    pub change_set: ChangeSet,

    /// File-level failures that were skipped over.
    pub failures: Vec<SubstitutionError>,
}
