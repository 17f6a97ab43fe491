//! Renderers for scan results.
//!
//! - [`text`]: human-readable listing for the terminal
//! - [`json`]: a single JSON document for scripting
//! - [`csv`]: one row per file for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::duplicates::{Criteria, DuplicateSession};
//! use dupefinder::output::json::JsonOutput;
//! use dupefinder::progress::NoProgress;
//!
//! let criteria = Criteria::default()
//!     .with_match_size(true)
//!     .with_match_content(true)
//!     .with_include_roots(vec![".".into()]);
//! let mut session = DuplicateSession::default();
//! let (groups, summary) = session
//!     .find_duplicates_with_summary(&criteria, &mut NoProgress)
//!     .unwrap();
//!
//! println!("{}", JsonOutput::new(&groups, &summary).to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod text;

use std::io;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::cli::OutputFormat;
use crate::duplicates::{DuplicateGroup, ScanSummary};

pub use self::csv::CsvOutput;
pub use self::json::JsonOutput;
pub use self::text::TextOutput;

/// Errors from rendering a report.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Writing to the destination failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
}

/// Render `groups` and `summary` in `format` to `writer`.
///
/// `color` only affects the text format.
///
/// # Errors
///
/// Returns [`OutputError`] if serialization or writing fails.
pub fn write_report<W: io::Write>(
    format: OutputFormat,
    groups: &[DuplicateGroup],
    summary: &ScanSummary,
    color: bool,
    writer: W,
) -> Result<(), OutputError> {
    log::debug!("Rendering {} groups as {}", groups.len(), format);
    match format {
        OutputFormat::Text => TextOutput::new(groups, summary)
            .with_color(color)
            .write_to(writer),
        OutputFormat::Json => JsonOutput::new(groups, summary).write_to(writer),
        OutputFormat::Csv => CsvOutput::new(groups).write_to(writer),
    }
}

/// RFC 3339 timestamp (UTC) for epoch milliseconds.
///
/// Out-of-range values render as `"unknown"`.
pub(crate) fn rfc3339_millis(modified_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(modified_ms)
        .map_or_else(|| "unknown".to_string(), |dt| dt.to_rfc3339())
}
