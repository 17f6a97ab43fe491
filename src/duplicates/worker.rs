//! Background scan worker.
//!
//! Runs a [`DuplicateSession`] on its own thread and forwards progress over a
//! crossbeam channel, so a foreground caller can keep redrawing or accept
//! input while the scan runs.
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::duplicates::{Criteria, FinderConfig, ScanEvent, ScanWorker};
//! use std::path::PathBuf;
//!
//! let criteria = Criteria::default()
//!     .with_match_content(true)
//!     .with_include_roots(vec![PathBuf::from(".")]);
//! let worker = ScanWorker::spawn(FinderConfig::default(), criteria).unwrap();
//!
//! for event in worker.events().iter() {
//!     match event {
//!         ScanEvent::Progress { processed, total } => eprintln!("{processed}/{total}"),
//!         ScanEvent::Finished(result) => {
//!             println!("{} groups", result.map(|(g, _)| g.len()).unwrap_or(0));
//!             break;
//!         }
//!         _ => {}
//!     }
//! }
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::progress::{ProgressCallback, ScanPhase};

use super::{Criteria, DuplicateGroup, DuplicateSession, FinderConfig, FinderError, ScanSummary};

/// Outcome of a background scan.
pub type ScanOutcome = Result<(Vec<DuplicateGroup>, ScanSummary), FinderError>;

/// Event sent from the worker thread.
#[derive(Debug)]
pub enum ScanEvent {
    /// A phase started
    PhaseStarted {
        /// The phase
        phase: ScanPhase,
        /// Items to process, 0 when unknown
        total: u64,
    },
    /// A candidate was found during the walk
    Discovered {
        /// Candidates found so far
        found: u64,
    },
    /// A candidate was keyed
    Progress {
        /// Candidates keyed so far
        processed: u64,
        /// Total candidates
        total: u64,
    },
    /// The scan ended. Always the last event.
    Finished(ScanOutcome),
}

/// Progress callback forwarding into a channel.
struct ChannelProgress {
    sender: Sender<ScanEvent>,
}

impl ChannelProgress {
    fn send(&self, event: ScanEvent) {
        // Receiver may be gone; the scan still runs to completion
        let _ = self.sender.send(event);
    }
}

impl ProgressCallback for ChannelProgress {
    fn on_phase_start(&mut self, phase: ScanPhase, total: u64) {
        self.send(ScanEvent::PhaseStarted { phase, total });
    }

    fn on_discovered(&mut self, found: u64, _path: &Path) {
        self.send(ScanEvent::Discovered { found });
    }

    fn on_progress(&mut self, processed: u64, total: u64) {
        self.send(ScanEvent::Progress { processed, total });
    }
}

/// Handle to a scan running on a background thread.
pub struct ScanWorker {
    cancel: Arc<AtomicBool>,
    events: Receiver<ScanEvent>,
    handle: Option<JoinHandle<()>>,
}

impl ScanWorker {
    /// Start a scan on a new thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(config: FinderConfig, criteria: Criteria) -> std::io::Result<Self> {
        let mut session = DuplicateSession::new(config);
        let cancel = session.cancel_handle();
        let (sender, events) = unbounded();

        let handle = thread::Builder::new()
            .name("dupefinder-scan".to_string())
            .spawn(move || {
                let mut progress = ChannelProgress { sender };
                let outcome = session.find_duplicates_with_summary(&criteria, &mut progress);
                progress.send(ScanEvent::Finished(outcome));
            })?;

        Ok(Self {
            cancel,
            events,
            handle: Some(handle),
        })
    }

    /// Channel of scan events.
    #[must_use]
    pub fn events(&self) -> &Receiver<ScanEvent> {
        &self.events
    }

    /// Request cancellation. The scan ends with [`FinderError::Interrupted`].
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Block until the scan finishes, discarding progress events.
    ///
    /// # Errors
    ///
    /// Returns the scan's error, or [`FinderError::WorkerLost`] if the thread
    /// ended without a result.
    pub fn wait(mut self) -> ScanOutcome {
        let mut outcome = None;
        for event in self.events.iter() {
            if let ScanEvent::Finished(result) = event {
                outcome = Some(result);
                break;
            }
        }

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Scan worker thread panicked");
            }
        }

        outcome.unwrap_or(Err(FinderError::WorkerLost))
    }
}

impl Drop for ScanWorker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.cancel();
            let _ = handle.join();
        }
    }
}
