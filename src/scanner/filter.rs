//! Path filter deciding which discovered files become candidates.
//!
//! # Overview
//!
//! Every regular file the walker visits passes through [`PathFilter::check`].
//! The checks run in a fixed order and stop at the first one that fires:
//!
//! 1. Exclusion roots (component prefix match on the normalized path)
//! 2. Hidden files, when `ignore_hidden` is set
//! 3. System files, when `ignore_system` is set
//! 4. Files the process cannot write, when `ignore_read_only` is set
//! 5. Zero-length files, when `ignore_zero_length` is set
//! 6. Size bounds (`min_bytes..=max_bytes`)
//!
//! The order only affects which [`SkipReason`] is reported; any single check
//! firing is enough to skip the file.

use std::fmt;
use std::fs::Metadata;
use std::path::Path;

use crate::duplicates::Criteria;

use super::path_utils::path_starts_with;

/// Platform marker for system file names (e.g. `$RECYCLE.BIN`, `$MFT`).
pub const SYSTEM_FILE_MARKER: char = '$';

/// Why a file was rejected by the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The path lies under an exclusion root.
    Excluded,
    /// The file is hidden.
    Hidden,
    /// The file is a system file.
    System,
    /// The file is not writable.
    ReadOnly,
    /// The file is empty.
    ZeroLength,
    /// The file is smaller than `min_bytes`.
    TooSmall,
    /// The file is larger than `max_bytes`.
    TooLarge,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Excluded => "excluded",
            Self::Hidden => "hidden",
            Self::System => "system",
            Self::ReadOnly => "read-only",
            Self::ZeroLength => "zero-length",
            Self::TooSmall => "below minimum size",
            Self::TooLarge => "above maximum size",
        };
        f.write_str(s)
    }
}

/// Eligibility checks for discovered files, bound to one scan's criteria.
#[derive(Debug, Clone, Copy)]
pub struct PathFilter<'a> {
    criteria: &'a Criteria,
}

impl<'a> PathFilter<'a> {
    /// Create a filter for the given criteria.
    #[must_use]
    pub fn new(criteria: &'a Criteria) -> Self {
        Self { criteria }
    }

    /// Returns `true` if the file must not become a candidate.
    #[must_use]
    pub fn should_skip(&self, path: &Path, metadata: &Metadata) -> bool {
        self.check(path, metadata).is_some()
    }

    /// Run all checks and return the first reason to skip, if any.
    #[must_use]
    pub fn check(&self, path: &Path, metadata: &Metadata) -> Option<SkipReason> {
        let c = self.criteria;

        if self.is_excluded(path) {
            return Some(SkipReason::Excluded);
        }
        if c.ignore_hidden && is_hidden(path, metadata) {
            return Some(SkipReason::Hidden);
        }
        if c.ignore_system && is_system(path, metadata) {
            return Some(SkipReason::System);
        }
        if c.ignore_read_only && !is_writable(path, metadata) {
            return Some(SkipReason::ReadOnly);
        }
        self.check_size(metadata.len())
    }

    /// Check whether `path` lies under any exclusion root.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.criteria
            .exclude_roots
            .iter()
            .any(|root| path_starts_with(path, root))
    }

    /// Apply the zero-length and size-bound checks.
    #[must_use]
    pub fn check_size(&self, size: u64) -> Option<SkipReason> {
        let c = self.criteria;

        if c.ignore_zero_length && size == 0 {
            Some(SkipReason::ZeroLength)
        } else if size < c.min_bytes {
            Some(SkipReason::TooSmall)
        } else if size > c.max_bytes {
            Some(SkipReason::TooLarge)
        } else {
            None
        }
    }
}

fn file_name_starts_with(path: &Path, marker: char) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(marker))
}

/// Check whether the platform reports the file as hidden.
///
/// Unix hides dot-files. On Windows the HIDDEN attribute is consulted as
/// well. Anything that cannot be determined counts as not hidden.
#[must_use]
pub fn is_hidden(path: &Path, metadata: &Metadata) -> bool {
    if file_name_starts_with(path, '.') {
        return true;
    }
    has_windows_attribute(metadata, WINDOWS_HIDDEN)
}

/// Check whether the file is a system file.
#[must_use]
pub fn is_system(path: &Path, metadata: &Metadata) -> bool {
    file_name_starts_with(path, SYSTEM_FILE_MARKER) || has_windows_attribute(metadata, WINDOWS_SYSTEM)
}

/// Check whether the current process may open the file for writing.
///
/// On Unix this asks the kernel (`access(2)` with `W_OK`), so ownership,
/// group membership, root privileges and read-only mounts are all taken
/// into account. Elsewhere the read-only attribute decides.
#[must_use]
pub fn is_writable(path: &Path, metadata: &Metadata) -> bool {
    #[cfg(unix)]
    {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let _ = metadata;
        let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
            return false;
        };
        // SAFETY: `c_path` is a valid NUL-terminated string for the duration of the call.
        unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
    }

    #[cfg(not(unix))]
    {
        let _ = path;
        !metadata.permissions().readonly()
    }
}

const WINDOWS_HIDDEN: u32 = 0x2;
const WINDOWS_SYSTEM: u32 = 0x4;

#[cfg(windows)]
fn has_windows_attribute(metadata: &Metadata, flag: u32) -> bool {
    use std::os::windows::fs::MetadataExt;
    metadata.file_attributes() & flag != 0
}

#[cfg(not(windows))]
fn has_windows_attribute(_metadata: &Metadata, _flag: u32) -> bool {
    false
}
