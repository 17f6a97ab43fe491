//! Human-readable report for the terminal.
//!
//! ```text
//! Group 1: 3 files, 2.0 MiB reclaimable
//!   /photos/a.jpg    1.0 MiB  2024-05-01 10:00:00
//!   /backup/a.jpg    1.0 MiB  2024-05-01 10:00:00
//!   /old/a.jpg       1.0 MiB  2024-05-01 10:00:00
//!
//! 1 group, 2 duplicate files, 2.0 MiB reclaimable (118 candidates, 35 ms)
//! ```

use std::io::Write;

use bytesize::ByteSize;
use chrono::{DateTime, Local};
use yansi::{Condition, Paint};

use super::OutputError;
use crate::duplicates::{DuplicateGroup, ScanSummary};

/// Text formatter.
pub struct TextOutput<'a> {
    groups: &'a [DuplicateGroup],
    summary: &'a ScanSummary,
    color: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a formatter with color enabled.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup], summary: &'a ScanSummary) -> Self {
        Self {
            groups,
            summary,
            color: true,
        }
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Io`] if writing fails.
    pub fn write_to<W: Write>(&self, mut w: W) -> Result<(), OutputError> {
        let when = if self.color {
            Condition::ALWAYS
        } else {
            Condition::NEVER
        };

        for (idx, group) in self.groups.iter().enumerate() {
            let header = format!(
                "Group {}: {} files, {} reclaimable",
                idx + 1,
                group.len(),
                ByteSize::b(group.wasted_space())
            );
            writeln!(w, "{}", header.bold().whenever(when))?;

            let width = group
                .files
                .iter()
                .map(|f| f.path.to_string_lossy().chars().count())
                .max()
                .unwrap_or(0);
            for (pos, file) in group.files.iter().enumerate() {
                let path = format!("{:<width$}", file.path.to_string_lossy());
                let path = if pos == 0 {
                    path.green().whenever(when)
                } else {
                    path.yellow().whenever(when)
                };
                writeln!(
                    w,
                    "  {}  {:>10}  {}",
                    path,
                    ByteSize::b(file.size).to_string(),
                    local_time(file.modified_ms).dim().whenever(when)
                )?;
            }
            writeln!(w)?;
        }

        writeln!(w, "{}", self.summary_line().whenever(when))?;
        if self.summary.has_errors() {
            let note = format!(
                "{} entries could not be walked, {} files could not be read",
                self.summary.traversal_errors, self.summary.digest_failures
            );
            writeln!(w, "{}", note.red().whenever(when))?;
        }
        Ok(())
    }

    /// Render the report as a string.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] if formatting fails.
    pub fn to_string(&self) -> Result<String, OutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn summary_line(&self) -> String {
        if self.groups.is_empty() {
            return format!(
                "No duplicates found ({} candidates, {} ms)",
                self.summary.candidates,
                self.summary.scan_duration.as_millis()
            );
        }
        let files: usize = self
            .groups
            .iter()
            .map(DuplicateGroup::duplicate_count)
            .sum();
        let reclaimable: u64 = self.groups.iter().map(DuplicateGroup::wasted_space).sum();
        format!(
            "{} {}, {} duplicate files, {} reclaimable ({} candidates, {} ms)",
            self.groups.len(),
            if self.groups.len() == 1 { "group" } else { "groups" },
            files,
            ByteSize::b(reclaimable),
            self.summary.candidates,
            self.summary.scan_duration.as_millis()
        )
    }
}

fn local_time(modified_ms: i64) -> String {
    DateTime::from_timestamp_millis(modified_ms).map_or_else(
        || "unknown".to_string(),
        |dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        },
    )
}
