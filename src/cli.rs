//! Command-line interface definitions.
//!
//! Global options (verbosity, color, error format) apply to every
//! subcommand. Flags given here override values from the configuration
//! file, see [`crate::config`].
//!
//! # Example
//!
//! ```bash
//! # Group by size and content (the usual duplicate check)
//! dupefinder scan ~/Pictures ~/Backup --by size,content
//!
//! # Skip a subtree and tiny files, print JSON
//! dupefinder scan ~/Downloads --exclude ~/Downloads/tmp --min-size 4KiB --output json
//!
//! # Keep the first file of every group, trash the rest
//! dupefinder scan ~/Music --delete --trash --yes
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::actions::DeleteMode;
use crate::config::Config;
use crate::duplicates::Criteria;

/// Find duplicate files by name, size, modification time or content.
#[derive(Debug, Parser)]
#[command(name = "dupefinder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan directories for duplicate files
    Scan(ScanArgs),
    /// Delete the given files
    Delete(DeleteArgs),
}

/// File property a group must agree on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchBy {
    /// Case-insensitive file name
    Name,
    /// Length in bytes
    Size,
    /// Last modification time
    Date,
    /// SHA-256 of the contents
    Content,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directories to scan
    #[arg(value_name = "ROOT", required = true)]
    pub roots: Vec<PathBuf>,

    /// Subtree or file to leave out (can be specified multiple times)
    #[arg(short, long, value_name = "PATH")]
    pub exclude: Vec<PathBuf>,

    /// Properties to match on, comma separated [default: from config]
    #[arg(long, value_enum, value_delimiter = ',', value_name = "PROPS")]
    pub by: Vec<MatchBy>,

    /// Minimum file size to consider (e.g., 1KB, 1MB, 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Maximum file size to consider (e.g., 1KB, 1MB, 1GB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// Skip empty files
    #[arg(long)]
    pub ignore_zero: bool,

    /// Skip hidden files
    #[arg(long)]
    pub ignore_hidden: bool,

    /// Skip system files
    #[arg(long)]
    pub ignore_system: bool,

    /// Skip read-only files
    #[arg(long)]
    pub ignore_readonly: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Delete every group member except the first
    #[arg(long)]
    pub delete: bool,

    /// Move deleted files to the trash instead of removing them
    #[arg(long, requires = "delete")]
    pub trash: bool,

    /// Skip the deletion confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl ScanArgs {
    /// Criteria from `config` with these flags applied on top.
    #[must_use]
    pub fn to_criteria(&self, config: &Config) -> Criteria {
        let mut criteria = config.to_criteria();

        if !self.by.is_empty() {
            criteria = criteria
                .with_match_name(self.by.contains(&MatchBy::Name))
                .with_match_size(self.by.contains(&MatchBy::Size))
                .with_match_date(self.by.contains(&MatchBy::Date))
                .with_match_content(self.by.contains(&MatchBy::Content));
        }

        criteria.ignore_zero_length |= self.ignore_zero;
        criteria.ignore_hidden |= self.ignore_hidden;
        criteria.ignore_system |= self.ignore_system;
        criteria.ignore_read_only |= self.ignore_readonly;

        let min = self.min_size.unwrap_or(criteria.min_bytes);
        let max = self.max_size.unwrap_or(criteria.max_bytes);
        criteria.exclude_roots.extend(self.exclude.iter().cloned());

        criteria
            .with_size_bounds(min, max)
            .with_include_roots(self.roots.clone())
    }

    /// Deletion mode, falling back to the configured one.
    #[must_use]
    pub fn delete_mode(&self, config: &Config) -> DeleteMode {
        if self.trash {
            DeleteMode::Trash
        } else {
            config.delete_mode
        }
    }
}

/// Arguments for the delete subcommand.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Files to delete
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Move files to the trash instead of removing them
    #[arg(long)]
    pub trash: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    Text,
    /// JSON report for scripting
    Json,
    /// One row per file for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use dupefinder::cli::parse_size;
///
/// assert_eq!(parse_size("512").unwrap(), 512);
/// assert_eq!(parse_size("4KiB").unwrap(), 4096);
/// assert_eq!(parse_size("2MB").unwrap(), 2_000_000);
/// ```
///
/// # Errors
///
/// Returns an error for an empty string, a malformed or negative number,
/// or an unknown suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }
    if s.starts_with('-') {
        return Err("Size cannot be negative".to_string());
    }

    let split = s
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(s.len());
    let (digits, suffix) = s.split_at(split);
    let suffix = suffix.trim().to_ascii_uppercase();

    let value: f64 = digits
        .parse()
        .map_err(|_| format!("Invalid number: '{digits}'"))?;

    let unit: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "K" | "KB" => 1_000,
        "KIB" => 1 << 10,
        "M" | "MB" => 1_000_000,
        "MIB" => 1 << 20,
        "G" | "GB" => 1_000_000_000,
        "GIB" => 1 << 30,
        "T" | "TB" => 1_000_000_000_000,
        "TIB" => 1 << 40,
        other => return Err(format!("Unknown size suffix: '{other}'")),
    };

    Ok((value * unit as f64) as u64)
}
