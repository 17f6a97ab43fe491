//! JSON output formatter.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "groups": [
//!     {
//!       "id": 1,
//!       "key": { "name": null, "size": 1024, "modified_ms": null, "digest": { "sha256": "ab12..." } },
//!       "wasted_space": 1024,
//!       "files": [
//!         { "path": "/photos/a.jpg", "size": 1024, "modified": "2024-05-01T10:00:00+00:00" },
//!         { "path": "/backup/a.jpg", "size": 1024, "modified": "2024-05-01T10:00:00+00:00" }
//!       ]
//!     }
//!   ],
//!   "summary": {
//!     "candidates": 120,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "reclaimable_space": 1024,
//!     "traversal_errors": 0,
//!     "digest_failures": 0,
//!     "scan_duration_ms": 35
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use super::{rfc3339_millis, OutputError};
use crate::duplicates::{CompositeKey, DuplicateGroup, ScanSummary};

/// One file in a group.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFile {
    /// Path as discovered
    pub path: String,
    /// Size in bytes
    pub size: u64,
    /// Last modified time (RFC 3339, UTC)
    pub modified: String,
}

/// One duplicate group.
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroup {
    /// 1-based position in result order
    pub id: usize,
    /// Key shared by all members
    pub key: CompositeKey,
    /// Bytes freed by keeping only the first file
    pub wasted_space: u64,
    /// Members in discovery order
    pub files: Vec<JsonFile>,
}

impl JsonGroup {
    fn from_group(id: usize, group: &DuplicateGroup) -> Self {
        Self {
            id,
            key: group.key.clone(),
            wasted_space: group.wasted_space(),
            files: group
                .files
                .iter()
                .map(|f| JsonFile {
                    path: f.path.to_string_lossy().into_owned(),
                    size: f.size,
                    modified: rfc3339_millis(f.modified_ms),
                })
                .collect(),
        }
    }
}

/// Scan statistics.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Include roots walked
    pub roots_walked: usize,
    /// Regular files seen
    pub files_visited: u64,
    /// Files that passed the filter
    pub candidates: u64,
    /// Files rejected by the filter
    pub files_skipped: u64,
    /// Entries that could not be walked
    pub traversal_errors: u64,
    /// Files whose content could not be read
    pub digest_failures: u64,
    /// Number of groups
    pub duplicate_groups: usize,
    /// Files beyond the first of each group
    pub duplicate_files: usize,
    /// Reclaimable bytes
    pub reclaimable_space: u64,
    /// Wall time in milliseconds
    pub scan_duration_ms: u64,
}

impl From<&ScanSummary> for JsonSummary {
    fn from(summary: &ScanSummary) -> Self {
        Self {
            roots_walked: summary.roots_walked,
            files_visited: summary.files_visited,
            candidates: summary.candidates,
            files_skipped: summary.files_skipped,
            traversal_errors: summary.traversal_errors,
            digest_failures: summary.digest_failures,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            scan_duration_ms: u64::try_from(summary.scan_duration.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Complete JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Groups in result order
    pub groups: Vec<JsonGroup>,
    /// Scan statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the report.
    ///
    /// # Example
    ///
    /// ```
    /// use dupefinder::duplicates::ScanSummary;
    /// use dupefinder::output::json::JsonOutput;
    ///
    /// let output = JsonOutput::new(&[], &ScanSummary::default());
    /// assert!(output.groups.is_empty());
    /// ```
    #[must_use]
    pub fn new(groups: &[DuplicateGroup], summary: &ScanSummary) -> Self {
        Self {
            groups: groups
                .iter()
                .enumerate()
                .map(|(idx, g)| JsonGroup::from_group(idx + 1, g))
                .collect(),
            summary: JsonSummary::from(summary),
        }
    }

    /// Serialize to a compact string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to a pretty-printed string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] if serialization or writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), OutputError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}
