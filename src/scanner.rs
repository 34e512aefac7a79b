use std::borrow::Cow;
use std::ffi::OsString;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{RenameError, Result};

/// A direct child of a scanned directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: OsString,
    pub is_dir: bool,
}

impl DirectoryEntry {
    pub fn new(name: impl Into<OsString>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            is_dir,
        }
    }

    /// Name as text; invalid UTF-8 is replaced lossily
    pub fn display_name(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }

    pub fn is_hidden(&self) -> bool {
        self.name.as_encoded_bytes().first() == Some(&b'.')
    }

    /// Visible directories are the only entries either pass looks at
    pub fn is_candidate(&self) -> bool {
        self.is_dir && !self.is_hidden()
    }
}

/// Lists the direct children of `path` in whatever order the OS returns them.
///
/// An unreadable root is fatal. Individual entries that fail to load are
/// skipped with a warning. Symlinks are not followed when deciding `is_dir`.
pub fn scan_directory(path: &Path) -> Result<Vec<DirectoryEntry>> {
    let read_dir = fs::read_dir(path).map_err(|e| RenameError::read_dir(path, e))?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(path = %path.display(), %err, "Skipping unreadable entry");
                continue;
            }
        };

        let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
        entries.push(DirectoryEntry::new(entry.file_name(), is_dir));
    }

    Ok(entries)
}

/// [`scan_directory`] narrowed to visible directories
pub fn candidate_folders(path: &Path) -> Result<Vec<DirectoryEntry>> {
    Ok(scan_directory(path)?
        .into_iter()
        .filter(DirectoryEntry::is_candidate)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_hidden_and_files_are_not_candidates() {
        assert!(!DirectoryEntry::new(".DS_Store", true).is_candidate());
        assert!(!DirectoryEntry::new("notes.txt", false).is_candidate());
        assert!(DirectoryEntry::new("Movie {tmdb-1}", true).is_candidate());
    }

    #[test]
    fn test_candidate_folders_filters_listing() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("Movie Title {tmdb-12345}")).unwrap();
        fs::create_dir(dir.path().join(".hidden")).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let folders = candidate_folders(dir.path()).unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].display_name(), "Movie Title {tmdb-12345}");
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = scan_directory(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, RenameError::ReadDir { .. }));
        assert!(err.is_fatal());
    }
}
