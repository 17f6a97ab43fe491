//! Match and filter criteria for a single scan.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings for one duplicate scan.
///
/// The four `match_*` flags choose which properties make up the composite
/// key. A disabled property never distinguishes two files. The `ignore_*`
/// flags and size bounds decide which files are considered at all.
///
/// # Example
///
/// ```
/// use dupefinder::duplicates::Criteria;
/// use std::path::PathBuf;
///
/// let criteria = Criteria::default()
///     .with_match_size(true)
///     .with_match_content(true)
///     .with_ignore_zero_length(true)
///     .with_include_roots(vec![PathBuf::from("/home/user/Pictures")]);
///
/// assert!(criteria.match_content);
/// assert_eq!(criteria.max_bytes, u64::MAX);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Criteria {
    /// Compare case-folded base names
    pub match_name: bool,
    /// Compare file sizes
    pub match_size: bool,
    /// Compare last-modified timestamps (millisecond precision)
    pub match_date: bool,
    /// Compare SHA-256 content digests
    pub match_content: bool,
    /// Skip empty files
    pub ignore_zero_length: bool,
    /// Skip system files
    pub ignore_system: bool,
    /// Skip files that are not writable
    pub ignore_read_only: bool,
    /// Skip hidden files
    pub ignore_hidden: bool,
    /// Smallest accepted size in bytes (inclusive)
    pub min_bytes: u64,
    /// Largest accepted size in bytes (inclusive)
    pub max_bytes: u64,
    /// Directory trees to scan, in order
    pub include_roots: Vec<PathBuf>,
    /// Path prefixes skipped entirely
    pub exclude_roots: Vec<PathBuf>,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            match_name: false,
            match_size: false,
            match_date: false,
            match_content: false,
            ignore_zero_length: false,
            ignore_system: false,
            ignore_read_only: false,
            ignore_hidden: false,
            min_bytes: 0,
            max_bytes: u64::MAX,
            include_roots: Vec::new(),
            exclude_roots: Vec::new(),
        }
    }
}

impl Criteria {
    /// Enable or disable name matching.
    #[must_use]
    pub fn with_match_name(mut self, enabled: bool) -> Self {
        self.match_name = enabled;
        self
    }

    /// Enable or disable size matching.
    #[must_use]
    pub fn with_match_size(mut self, enabled: bool) -> Self {
        self.match_size = enabled;
        self
    }

    /// Enable or disable modification time matching.
    #[must_use]
    pub fn with_match_date(mut self, enabled: bool) -> Self {
        self.match_date = enabled;
        self
    }

    /// Enable or disable content matching.
    #[must_use]
    pub fn with_match_content(mut self, enabled: bool) -> Self {
        self.match_content = enabled;
        self
    }

    /// Skip or keep empty files.
    #[must_use]
    pub fn with_ignore_zero_length(mut self, enabled: bool) -> Self {
        self.ignore_zero_length = enabled;
        self
    }

    /// Skip or keep system files.
    #[must_use]
    pub fn with_ignore_system(mut self, enabled: bool) -> Self {
        self.ignore_system = enabled;
        self
    }

    /// Skip or keep read-only files.
    #[must_use]
    pub fn with_ignore_read_only(mut self, enabled: bool) -> Self {
        self.ignore_read_only = enabled;
        self
    }

    /// Skip or keep hidden files.
    #[must_use]
    pub fn with_ignore_hidden(mut self, enabled: bool) -> Self {
        self.ignore_hidden = enabled;
        self
    }

    /// Set the inclusive size bounds.
    #[must_use]
    pub fn with_size_bounds(mut self, min_bytes: u64, max_bytes: u64) -> Self {
        self.min_bytes = min_bytes;
        self.max_bytes = max_bytes;
        self
    }

    /// Set the directory trees to scan.
    #[must_use]
    pub fn with_include_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.include_roots = roots;
        self
    }

    /// Set the path prefixes to skip.
    #[must_use]
    pub fn with_exclude_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.exclude_roots = roots;
        self
    }

    /// Whether at least one property takes part in the composite key.
    ///
    /// With none enabled every candidate lands in the same group.
    #[must_use]
    pub fn any_match_enabled(&self) -> bool {
        self.match_name || self.match_size || self.match_date || self.match_content
    }

    /// Whether the size bounds admit at least one size.
    #[must_use]
    pub fn has_valid_bounds(&self) -> bool {
        self.min_bytes <= self.max_bytes
    }
}
