//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and handing every regular file to a [`Visitor`]. Traversal is
//! single-threaded and deterministic: entries are sorted by file name and
//! visited depth-first.
//!
//! # Features
//!
//! - Symlinks are never followed, so link cycles cannot occur
//! - Unreadable directories and files are reported to the visitor and skipped
//! - Directory visits may prune a subtree with [`Visit::SkipSubtree`]
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::scanner::{Visit, Visitor, Walker};
//! use std::fs::Metadata;
//! use std::path::{Path, PathBuf};
//!
//! #[derive(Default)]
//! struct Collect(Vec<PathBuf>);
//!
//! impl Visitor for Collect {
//!     fn visit_dir(&mut self, path: &Path) -> Visit {
//!         if path.ends_with("node_modules") {
//!             Visit::SkipSubtree
//!         } else {
//!             Visit::Continue
//!         }
//!     }
//!
//!     fn visit_file(&mut self, path: &Path, _metadata: &Metadata) -> Visit {
//!         self.0.push(path.to_path_buf());
//!         Visit::Continue
//!     }
//! }
//!
//! let mut collect = Collect::default();
//! let stats = Walker::new(Path::new(".")).walk(&mut collect);
//! println!("{} files, {} errors", stats.files, stats.errors);
//! ```

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::ScanError;

/// Outcome of a visitor callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Keep walking.
    Continue,
    /// Do not descend into this directory. Has no effect for files.
    SkipSubtree,
}

/// Receiver of walk events.
///
/// Only [`Visitor::visit_file`] is required. Directory visits continue and
/// failures are ignored unless overridden.
pub trait Visitor {
    /// Called before descending into a directory, including the root.
    fn visit_dir(&mut self, _path: &Path) -> Visit {
        Visit::Continue
    }

    /// Called for every regular file.
    fn visit_file(&mut self, path: &Path, metadata: &Metadata) -> Visit;

    /// Called when an entry cannot be read. The walk always continues.
    fn visit_failed(&mut self, _error: ScanError) {}
}

/// Counters for a single walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Directories entered
    pub directories: u64,
    /// Regular files handed to the visitor
    pub files: u64,
    /// Entries that could not be read
    pub errors: u64,
    /// Whether the walk stopped early on shutdown
    pub interrupted: bool,
}

/// Depth-first directory walker.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupefinder::scanner::Walker;
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."));
    /// ```
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// The flag is checked between entries. When it is set the walk stops
    /// and [`WalkStats::interrupted`] is reported.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Root path of this walker.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk the tree, reporting every regular file to `visitor`.
    ///
    /// Errors never stop the walk; each one is passed to
    /// [`Visitor::visit_failed`] and counted.
    pub fn walk<V: Visitor + ?Sized>(&self, visitor: &mut V) -> WalkStats {
        let mut stats = WalkStats::default();
        let mut entries = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        loop {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                stats.interrupted = true;
                break;
            }

            let entry = match entries.next() {
                None => break,
                Some(Ok(entry)) => entry,
                Some(Err(e)) => {
                    stats.errors += 1;
                    visitor.visit_failed(self.convert_error(e));
                    continue;
                }
            };

            let file_type = entry.file_type();
            let path = entry.path();

            if file_type.is_dir() {
                stats.directories += 1;
                if visitor.visit_dir(path) == Visit::SkipSubtree {
                    log::trace!("Pruning directory: {}", path.display());
                    entries.skip_current_dir();
                }
                continue;
            }

            if !file_type.is_file() {
                log::trace!("Skipping non-regular entry: {}", path.display());
                continue;
            }

            match entry.metadata() {
                Ok(metadata) => {
                    stats.files += 1;
                    visitor.visit_file(path, &metadata);
                }
                Err(e) => {
                    stats.errors += 1;
                    visitor.visit_failed(self.convert_error(e));
                }
            }
        }

        stats
    }

    /// Turn a walkdir error into a [`ScanError`], logging it.
    fn convert_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if error.loop_ancestor().is_some() {
            log::warn!("Filesystem loop detected at {}", path.display());
            return ScanError::Loop(path);
        }

        let err = match error.into_io_error() {
            Some(io) => ScanError::from_io(&path, io),
            None => ScanError::Io {
                path: path.clone(),
                source: std::io::Error::other("directory walk failed"),
            },
        };

        match &err {
            ScanError::NotFound(p) => {
                log::debug!("Path not found (may have been deleted): {}", p.display());
            }
            other => log::warn!("{other}"),
        }
        err
    }
}
