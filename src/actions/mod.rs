//! File actions module.
//!
//! Deletion of files selected from duplicate groups:
//! - Permanent removal (default)
//! - Move to system trash (recoverable)
//! - Per-path failure tolerance with a success/failure tally
//! - Helpers to keep at least one copy and to update groups afterwards
//!
//! ```no_run
//! use dupefinder::actions::{delete_paths, DeleteMode};
//! use std::path::PathBuf;
//!
//! let tally = delete_paths(&[PathBuf::from("/path/to/duplicate.txt")], DeleteMode::Trash);
//! println!("{} deleted, {} failed", tally.succeeded, tally.failed);
//! ```

pub mod delete;

// Re-export commonly used types
pub use delete::{
    delete_file, delete_paths, prune_groups, select_all_but_first, validate_preserves_copy,
    DeleteError, DeleteMode, DeleteTally,
};
