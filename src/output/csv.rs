//! CSV output formatter.
//!
//! One row per file in a duplicate group. The header is always written,
//! so an empty result is still a valid CSV document.
//!
//! # Columns
//!
//! - `group_id`: 1-based index of the group in result order
//! - `path`: Path to the file
//! - `size`: File size in bytes
//! - `modified`: Last modified time (RFC 3339, UTC)
//! - `digest`: Content digest, empty when content was not matched

use std::io;

use serde::Serialize;

use super::{rfc3339_millis, OutputError};
use crate::duplicates::DuplicateGroup;

const HEADER: [&str; 5] = ["group_id", "path", "size", "modified", "digest"];

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    group_id: usize,
    path: std::borrow::Cow<'a, str>,
    size: u64,
    modified: String,
    digest: String,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    groups: &'a [DuplicateGroup],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self { groups }
    }

    /// Write the CSV document to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), OutputError> {
        let mut out = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        out.write_record(HEADER)?;

        for (idx, group) in self.groups.iter().enumerate() {
            let digest = group.digest().map(ToString::to_string).unwrap_or_default();
            for file in &group.files {
                out.serialize(CsvRow {
                    group_id: idx + 1,
                    path: file.path.to_string_lossy(),
                    size: file.size,
                    modified: rfc3339_millis(file.modified_ms),
                    digest: digest.clone(),
                })?;
            }
        }

        out.flush()?;
        Ok(())
    }

    /// Render the CSV document as a string.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] if serialization fails.
    pub fn to_string(&self) -> Result<String, OutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
