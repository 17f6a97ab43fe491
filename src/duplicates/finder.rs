//! Duplicate session orchestrating the walk and grouping phases.
//!
//! # Overview
//!
//! A scan runs in two phases:
//! 1. **Walking**: each include root is walked in order. Every regular file
//!    passes through the [`PathFilter`]; survivors become candidates.
//! 2. **Keying**: candidates are keyed in discovery order and bucketed by
//!    the [`GroupingEngine`]. Progress is reported after every candidate.
//!
//! Cancellation is cooperative. The shared flag is checked between walked
//! entries and before each candidate is keyed. A cancelled scan returns
//! [`FinderError::Interrupted`], never a partial result.
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::duplicates::{Criteria, DuplicateSession, FinderConfig};
//! use std::path::PathBuf;
//!
//! let criteria = Criteria::default()
//!     .with_match_size(true)
//!     .with_match_content(true)
//!     .with_include_roots(vec![PathBuf::from(".")]);
//!
//! let mut session = DuplicateSession::new(FinderConfig::default());
//! let groups = session
//!     .find_duplicates(&criteria, &mut |processed: u64, total: u64| {
//!         eprintln!("{processed}/{total}");
//!     })
//!     .unwrap();
//!
//! println!("Found {} duplicate groups", groups.len());
//! ```

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use crate::actions::{delete_paths, DeleteMode, DeleteTally};
use crate::progress::{ProgressCallback, ScanPhase};
use crate::scanner::path_utils::non_overlapping_roots;
use crate::scanner::{
    Candidate, Hasher, PathFilter, ScanError, Visit, Visitor, Walker, DEFAULT_BUFFER_SIZE,
};

use super::{Criteria, DuplicateGroup, GroupingEngine};

/// Configuration for a [`DuplicateSession`].
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Read chunk size for content hashing
    pub hash_buffer_size: usize,
    /// Optional shared cancellation flag
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            hash_buffer_size: DEFAULT_BUFFER_SIZE,
            shutdown_flag: None,
        }
    }
}

impl FinderConfig {
    /// Set the read chunk size for content hashing.
    #[must_use]
    pub fn with_hash_buffer_size(mut self, size: usize) -> Self {
        self.hash_buffer_size = size;
        self
    }

    /// Share a cancellation flag, e.g. the Ctrl+C handler's.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Include roots actually walked after collapsing overlaps
    pub roots_walked: usize,
    /// Regular files seen by the walker
    pub files_visited: u64,
    /// Files that passed the filter
    pub candidates: u64,
    /// Files rejected by the filter
    pub files_skipped: u64,
    /// Entries that could not be read during the walk
    pub traversal_errors: u64,
    /// Files whose content could not be hashed
    pub digest_failures: u64,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Files in duplicate groups, excluding the first member of each
    pub duplicate_files: usize,
    /// Bytes freed by keeping only the first member of every group
    pub reclaimable_space: u64,
    /// Wall time of the scan
    pub scan_duration: Duration,
    /// Errors encountered during the walk
    pub scan_errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Whether any file could not be walked or hashed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.traversal_errors > 0 || self.digest_failures > 0
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was cancelled before it finished.
    #[error("Scan interrupted by user")]
    Interrupted,

    /// A background scan ended without reporting a result.
    #[error("Scan worker stopped without a result")]
    WorkerLost,
}

/// Walk visitor collecting candidates that pass the filter.
struct CandidateCollector<'a, 'p, P: ProgressCallback + ?Sized> {
    filter: PathFilter<'a>,
    progress: &'p mut P,
    candidates: Vec<Candidate>,
    skipped: u64,
    errors: Vec<ScanError>,
}

impl<P: ProgressCallback + ?Sized> Visitor for CandidateCollector<'_, '_, P> {
    fn visit_dir(&mut self, path: &Path) -> Visit {
        if self.filter.is_excluded(path) {
            log::debug!("Skipping excluded directory: {}", path.display());
            Visit::SkipSubtree
        } else {
            Visit::Continue
        }
    }

    fn visit_file(&mut self, path: &Path, metadata: &Metadata) -> Visit {
        match self.filter.check(path, metadata) {
            Some(reason) => {
                log::trace!("Skipping {} ({})", path.display(), reason);
                self.skipped += 1;
            }
            None => {
                self.candidates.push(Candidate::from_metadata(path, metadata));
                self.progress
                    .on_discovered(self.candidates.len() as u64, path);
            }
        }
        Visit::Continue
    }

    fn visit_failed(&mut self, error: ScanError) {
        self.errors.push(error);
    }
}

/// One duplicate-finding session.
///
/// Operations take `&mut self`, so a session runs one scan or one deletion
/// batch at a time.
#[derive(Debug)]
pub struct DuplicateSession {
    hasher: Hasher,
    cancel: Arc<AtomicBool>,
}

impl Default for DuplicateSession {
    fn default() -> Self {
        Self::new(FinderConfig::default())
    }
}

impl DuplicateSession {
    /// Create a new session with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            hasher: Hasher::new().with_buffer_size(config.hash_buffer_size),
            cancel: config
                .shutdown_flag
                .unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    /// Flag that cancels the running scan when set.
    #[must_use]
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Clear a pending cancellation so the next scan runs.
    ///
    /// Scans that end with [`FinderError::Interrupted`] do this themselves.
    pub fn reset_cancel(&self) {
        self.cancel.store(false, Ordering::SeqCst);
    }

    /// Check if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Find duplicate groups for the given criteria.
    ///
    /// # Arguments
    ///
    /// * `criteria` - Roots, filters and match properties
    /// * `progress` - Receives `(processed, total)` after each keyed candidate
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Interrupted`] if the scan was cancelled.
    pub fn find_duplicates<P>(
        &mut self,
        criteria: &Criteria,
        progress: &mut P,
    ) -> Result<Vec<DuplicateGroup>, FinderError>
    where
        P: ProgressCallback + ?Sized,
    {
        self.find_duplicates_with_summary(criteria, progress)
            .map(|(groups, _)| groups)
    }

    /// Find duplicate groups and return scan statistics alongside them.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Interrupted`] if the scan was cancelled. The
    /// cancellation is consumed, so the session can scan again afterwards.
    pub fn find_duplicates_with_summary<P>(
        &mut self,
        criteria: &Criteria,
        progress: &mut P,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError>
    where
        P: ProgressCallback + ?Sized,
    {
        let result = self.scan(criteria, progress);
        if matches!(result, Err(FinderError::Interrupted)) {
            self.reset_cancel();
        }
        result
    }

    fn scan<P>(
        &mut self,
        criteria: &Criteria,
        progress: &mut P,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError>
    where
        P: ProgressCallback + ?Sized,
    {
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();

        if self.is_cancelled() {
            return Err(FinderError::Interrupted);
        }

        // Phase 1: walk
        progress.on_phase_start(ScanPhase::Walking, 0);
        let candidates = self.collect_candidates(criteria, &mut summary, progress)?;
        progress.on_phase_end(ScanPhase::Walking);

        log::info!(
            "Found {} candidates ({} skipped, {} errors)",
            summary.candidates,
            summary.files_skipped,
            summary.traversal_errors
        );

        // Phase 2: key and bucket
        let total = candidates.len() as u64;
        progress.on_phase_start(ScanPhase::Keying, total);

        let mut engine = GroupingEngine::new(criteria, self.hasher);
        if total == 0 {
            progress.on_progress(0, 0);
        }
        for (idx, candidate) in candidates.into_iter().enumerate() {
            if self.is_cancelled() {
                log::debug!("Shutdown requested during keying");
                return Err(FinderError::Interrupted);
            }
            engine.insert(candidate);
            progress.on_progress(idx as u64 + 1, total);
        }
        progress.on_phase_end(ScanPhase::Keying);

        let (groups, stats) = engine.finish();

        summary.digest_failures = stats.digest_failures as u64;
        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        summary.reclaimable_space = groups.iter().map(DuplicateGroup::wasted_space).sum();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} groups, {} duplicate files, {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display()
        );

        Ok((groups, summary))
    }

    /// Delete files selected from a previous scan.
    ///
    /// Groups are not re-derived; use [`crate::actions::prune_groups`].
    pub fn delete(&mut self, paths: &[PathBuf], mode: DeleteMode) -> DeleteTally {
        delete_paths(paths, mode)
    }

    fn collect_candidates<P>(
        &self,
        criteria: &Criteria,
        summary: &mut ScanSummary,
        progress: &mut P,
    ) -> Result<Vec<Candidate>, FinderError>
    where
        P: ProgressCallback + ?Sized,
    {
        let mut collector = CandidateCollector {
            filter: PathFilter::new(criteria),
            progress,
            candidates: Vec::new(),
            skipped: 0,
            errors: Vec::new(),
        };

        for root in non_overlapping_roots(&criteria.include_roots) {
            if !root.exists() {
                log::warn!("Include root does not exist, skipping: {}", root.display());
                continue;
            }

            log::debug!("Walking {}", root.display());
            summary.roots_walked += 1;

            let stats = Walker::new(&root)
                .with_shutdown_flag(self.cancel_handle())
                .walk(&mut collector);

            summary.files_visited += stats.files;
            if stats.interrupted {
                return Err(FinderError::Interrupted);
            }
        }

        summary.candidates = collector.candidates.len() as u64;
        summary.files_skipped = collector.skipped;
        summary.traversal_errors = collector.errors.len() as u64;
        summary.scan_errors = collector.errors;

        Ok(collector.candidates)
    }
}
