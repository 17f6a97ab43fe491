//! Ctrl+C handling for cooperative cancellation.
//!
//! A [`ShutdownHandler`] owns the `Arc<AtomicBool>` that a
//! [`DuplicateSession`](crate::duplicates::DuplicateSession) checks between
//! files. [`install_handler`] hooks Ctrl+C so the flag is set on interrupt,
//! which turns the running scan into [`FinderError::Interrupted`] and exit
//! code 130.
//!
//! [`FinderError::Interrupted`]: crate::duplicates::FinderError::Interrupted
//!
//! ```rust,no_run
//! use dupefinder::duplicates::{DuplicateSession, FinderConfig};
//! use dupefinder::signal::install_handler;
//!
//! let handler = install_handler().unwrap();
//! let session = DuplicateSession::new(FinderConfig::default().with_shutdown_flag(handler.get_flag()));
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Exit code for SIGINT (128 + 2).
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Shared shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once Ctrl+C was pressed or [`Self::request_shutdown`] called.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Set the flag.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clone of the flag for sessions and workers.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Clear the flag.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();
static INSTALL_LOCK: Mutex<()> = Mutex::new(());

/// Install the process-wide Ctrl+C handler.
///
/// Repeated calls return the already installed handler with its flag
/// cleared, so `run_app` can be invoked more than once in one process.
///
/// # Errors
///
/// Returns [`SignalError::InstallFailed`] if another Ctrl+C handler was
/// registered outside this module.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    let _guard = INSTALL_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();

    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let _ = writeln!(std::io::stderr(), "\nInterrupted. Finishing current file...");
        let _ = std::io::stderr().flush();
        log::info!("Shutdown signal received");
    })?;

    let _ = GLOBAL_HANDLER.set(handler.clone());
    Ok(handler)
}
