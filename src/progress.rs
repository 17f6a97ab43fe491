//! Progress reporting for duplicate scans.
//!
//! [`ProgressCallback`] is the port a scan reports through. Any
//! `FnMut(u64, u64)` closure implements it, receiving `(processed, total)`
//! once per keyed candidate. The [`Progress`] reporter draws the same events
//! as indicatif progress bars for the command line.

use std::path::Path;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Stage of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// Walking include roots and filtering files
    Walking,
    /// Building composite keys (hashing when content is matched)
    Keying,
}

impl ScanPhase {
    /// Display name of the phase.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Keying => "keying",
        }
    }
}

/// Receiver of scan progress.
///
/// Callbacks run synchronously on the scanning thread and should return
/// quickly. Only [`ProgressCallback::on_progress`] is required.
pub trait ProgressCallback {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - The phase starting
    /// * `total` - Items to process, or 0 when unknown (walking)
    fn on_phase_start(&mut self, _phase: ScanPhase, _total: u64) {}

    /// Called for each file accepted as a candidate during the walk.
    ///
    /// # Arguments
    ///
    /// * `found` - Candidates found so far (1-based)
    /// * `path` - The candidate just found
    fn on_discovered(&mut self, _found: u64, _path: &Path) {}

    /// Called after each candidate is keyed.
    ///
    /// `processed` rises by one per call and the final call reports
    /// `processed == total`. An empty scan makes a single `(0, 0)` call.
    fn on_progress(&mut self, processed: u64, total: u64);

    /// Called when a phase completes.
    fn on_phase_end(&mut self, _phase: ScanPhase) {}
}

impl<F> ProgressCallback for F
where
    F: FnMut(u64, u64),
{
    fn on_progress(&mut self, processed: u64, total: u64) {
        self(processed, total);
    }
}

/// Progress callback that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_progress(&mut self, _processed: u64, _total: u64) {}
}

/// Terminal progress reporter using indicatif.
///
/// Shows a spinner while walking and a bar while keying.
pub struct Progress {
    multi: MultiProgress,
    walking: Option<ProgressBar>,
    keying: Option<ProgressBar>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupefinder::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// assert!(progress.is_quiet());
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let multi = if quiet {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        } else {
            MultiProgress::new()
        };
        Self {
            multi,
            walking: None,
            keying: None,
            quiet,
        }
    }

    /// Whether drawing is suppressed.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn keying_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&mut self, phase: ScanPhase, total: u64) {
        if self.quiet {
            return;
        }

        match phase {
            ScanPhase::Walking => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::walking_style());
                pb.set_message("Walking");
                pb.enable_steady_tick(Duration::from_millis(100));
                self.walking = Some(pb);
            }
            ScanPhase::Keying => {
                let pb = self.multi.add(ProgressBar::new(total));
                pb.set_style(Self::keying_style());
                pb.set_message("Comparing");
                self.keying = Some(pb);
            }
        }
    }

    fn on_discovered(&mut self, found: u64, path: &Path) {
        if let Some(pb) = &self.walking {
            pb.set_position(found);
            pb.set_message(truncate_path(&path.to_string_lossy(), 30));
        }
    }

    fn on_progress(&mut self, processed: u64, total: u64) {
        if let Some(pb) = &self.keying {
            pb.set_length(total);
            pb.set_position(processed);
        }
    }

    fn on_phase_end(&mut self, phase: ScanPhase) {
        match phase {
            ScanPhase::Walking => {
                if let Some(pb) = self.walking.take() {
                    pb.finish_with_message("Walking complete");
                }
            }
            ScanPhase::Keying => {
                if let Some(pb) = self.keying.take() {
                    pb.finish_with_message("Comparison complete");
                }
            }
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_chars: usize) -> String {
    if path.chars().count() <= max_chars {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_chars {
        let keep = max_chars.saturating_sub(3);
        let tail: String = file_name.chars().skip(name_len.saturating_sub(keep)).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
