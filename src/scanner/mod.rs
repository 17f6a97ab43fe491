//! Scanner module for directory traversal, filtering and content hashing.
//!
//! This module provides functionality for:
//! - Deterministic directory walking using walkdir
//! - Per-file eligibility checks (exclusions, attributes, size bounds)
//! - Streaming SHA-256 content fingerprints
//! - Unicode path normalization
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal with an explicit visitor interface
//! - [`filter`]: The path filter deciding which files become candidates
//! - [`hasher`]: SHA-256 file fingerprinting (streaming, never fails)
//! - [`path_utils`]: NFC normalization and prefix comparison
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::scanner::{Visit, Visitor, Walker};
//! use std::fs::Metadata;
//! use std::path::Path;
//!
//! struct Printer;
//!
//! impl Visitor for Printer {
//!     fn visit_file(&mut self, path: &Path, metadata: &Metadata) -> Visit {
//!         println!("{}: {} bytes", path.display(), metadata.len());
//!         Visit::Continue
//!     }
//! }
//!
//! Walker::new(Path::new(".")).walk(&mut Printer);
//! ```

pub mod filter;
pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// Re-export main types
pub use filter::{PathFilter, SkipReason};
pub use hasher::{DigestToken, Hasher, DEFAULT_BUFFER_SIZE};
pub use walker::{Visit, Visitor, WalkStats, Walker};

/// A regular file that passed the path filter.
///
/// Size and modification time are captured once at discovery; later changes
/// to the file on disk are not observed by the scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Path to the file, as reached from its include root
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modification time in milliseconds since the Unix epoch
    pub modified_ms: i64,
}

impl Candidate {
    /// Create a new candidate.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    /// * `modified_ms` - Last modification time in epoch milliseconds
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified_ms: i64) -> Self {
        Self {
            path,
            size,
            modified_ms,
        }
    }

    /// Capture a candidate from file metadata.
    #[must_use]
    pub fn from_metadata(path: &Path, metadata: &Metadata) -> Self {
        let modified = metadata.modified().unwrap_or(UNIX_EPOCH);
        Self::new(path.to_path_buf(), metadata.len(), epoch_millis(modified))
    }

    /// The file's base name, if it has one.
    #[must_use]
    pub fn file_name(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    }
}

/// Convert a [`SystemTime`] into milliseconds relative to the Unix epoch.
///
/// Times before the epoch produce negative values.
#[must_use]
pub fn epoch_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_millis()).unwrap_or(i64::MAX),
        Err(e) => -i64::try_from(e.duration().as_millis()).unwrap_or(i64::MAX),
    }
}

/// Errors that can occur during directory scanning.
///
/// These never abort a scan; the walker reports them to its visitor and
/// moves on to the next entry.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// A symbolic link loop was detected.
    #[error("Filesystem loop at {0}")]
    Loop(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error for the given path.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::Loop(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while hashing `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
