//! Bulk deletion of selected duplicate files.
//!
//! # Overview
//!
//! [`delete_paths`] attempts every requested path independently and tallies
//! the outcome:
//! - A deleted file counts as a success.
//! - A path that no longer exists counts as a failure.
//! - Any other I/O error counts as a failure; later paths are still tried.
//!
//! Deletion never re-scans. Callers update their groups with
//! [`prune_groups`].
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::actions::{delete_paths, DeleteMode};
//! use std::path::PathBuf;
//!
//! let paths = vec![PathBuf::from("/tmp/copy-1.jpg"), PathBuf::from("/tmp/copy-2.jpg")];
//! let tally = delete_paths(&paths, DeleteMode::Permanent);
//! println!("{}", tally.summary());
//! ```

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duplicates::DuplicateGroup;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed {
        /// Path that could not be moved
        path: PathBuf,
        /// Message from the trash backend
        message: String,
    },

    /// Attempted to delete all copies (at least one must be preserved).
    #[error("cannot delete all copies - at least one file must be preserved")]
    AllCopiesWouldBeDeleted,

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Classify an I/O error for `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Get the path associated with this error (if any).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::TrashFailed { path: p, .. }
            | Self::Io { path: p, .. } => Some(p),
            Self::AllCopiesWouldBeDeleted => None,
        }
    }
}

/// How files are removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Remove the file immediately.
    #[default]
    Permanent,
    /// Move the file to the system trash.
    Trash,
}

/// Outcome of a deletion batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteTally {
    /// Paths removed
    pub succeeded: u64,
    /// Paths not removed
    pub failed: u64,
    /// Failed paths with the reason
    pub failures: Vec<(PathBuf, String)>,
    /// Bytes freed by the removed files
    pub bytes_freed: u64,
    /// Paths removed, in request order
    pub deleted: Vec<PathBuf>,
}

impl DeleteTally {
    /// Total number of attempted deletions.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.succeeded + self.failed
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let freed = ByteSize::b(self.bytes_freed);
        if self.all_succeeded() {
            format!("Deleted {} file(s), freed {}", self.succeeded, freed)
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {}",
                self.succeeded, self.failed, freed
            )
        }
    }
}

/// Delete one file, returning its size.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if deletion is not allowed
/// - `TrashFailed` if the trash backend refuses the file
pub fn delete_file(path: &Path, mode: DeleteMode) -> Result<u64, DeleteError> {
    let size = fs::symlink_metadata(path)
        .map_err(|e| DeleteError::from_io(path, e))?
        .len();

    match mode {
        DeleteMode::Permanent => {
            fs::remove_file(path).map_err(|e| DeleteError::from_io(path, e))?;
            log::info!("Permanently deleted: {} ({} bytes)", path.display(), size);
        }
        DeleteMode::Trash => {
            trash::delete(path).map_err(|e| DeleteError::TrashFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            log::info!("Moved to trash: {} ({} bytes)", path.display(), size);
        }
    }

    Ok(size)
}

/// Delete every path, counting successes and failures.
///
/// Every path is attempted regardless of earlier failures.
#[must_use]
pub fn delete_paths(paths: &[PathBuf], mode: DeleteMode) -> DeleteTally {
    let mut tally = DeleteTally::default();

    for path in paths {
        match delete_file(path, mode) {
            Ok(size) => {
                tally.succeeded += 1;
                tally.bytes_freed += size;
                tally.deleted.push(path.clone());
            }
            Err(e) => {
                log::warn!("Failed to delete {}: {}", path.display(), e);
                tally.failed += 1;
                tally.failures.push((path.clone(), e.to_string()));
            }
        }
    }

    log::info!("{}", tally.summary());
    tally
}

/// Remove deleted members from groups and drop groups left with fewer than
/// two members.
///
/// Remaining groups and members keep their order.
pub fn prune_groups(groups: &mut Vec<DuplicateGroup>, deleted: &[PathBuf]) {
    let deleted: HashSet<&Path> = deleted.iter().map(PathBuf::as_path).collect();

    for group in groups.iter_mut() {
        group.files.retain(|f| !deleted.contains(f.path.as_path()));
    }
    groups.retain(|g| g.len() >= 2);
}

/// Select every member except the first of each group.
///
/// The result never removes all copies of a group.
#[must_use]
pub fn select_all_but_first(groups: &[DuplicateGroup]) -> Vec<PathBuf> {
    groups
        .iter()
        .flat_map(|g| g.files.iter().skip(1).map(|f| f.path.clone()))
        .collect()
}

/// Validate that a selection doesn't delete all copies.
///
/// # Errors
///
/// Returns `AllCopiesWouldBeDeleted` if no member of the group remains.
///
/// # Example
///
/// ```
/// use dupefinder::actions::validate_preserves_copy;
/// use std::path::PathBuf;
///
/// let group = vec![PathBuf::from("/original.txt"), PathBuf::from("/copy.txt")];
///
/// assert!(validate_preserves_copy(&[PathBuf::from("/copy.txt")], &group).is_ok());
/// assert!(validate_preserves_copy(&group, &group).is_err());
/// ```
pub fn validate_preserves_copy(
    selected_paths: &[PathBuf],
    group_paths: &[PathBuf],
) -> Result<(), DeleteError> {
    let selected: HashSet<&PathBuf> = selected_paths.iter().collect();
    let preserved = group_paths.iter().filter(|p| !selected.contains(p)).count();

    if preserved == 0 {
        log::error!(
            "Attempted to delete all {} copies of a duplicate group",
            group_paths.len()
        );
        Err(DeleteError::AllCopiesWouldBeDeleted)
    } else {
        Ok(())
    }
}
