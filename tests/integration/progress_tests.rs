use dupefinder::duplicates::{Criteria, DuplicateSession};
use dupefinder::progress::{ProgressCallback, ScanPhase};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
    progress: Vec<(u64, u64)>,
    discovered: u64,
}

impl ProgressCallback for Recorder {
    fn on_phase_start(&mut self, phase: ScanPhase, total: u64) {
        self.events.push(format!("start {} {}", phase.name(), total));
    }

    fn on_discovered(&mut self, found: u64, _path: &Path) {
        self.discovered = found;
    }

    fn on_progress(&mut self, processed: u64, total: u64) {
        self.progress.push((processed, total));
    }

    fn on_phase_end(&mut self, phase: ScanPhase) {
        self.events.push(format!("end {}", phase.name()));
    }
}

fn criteria(root: &Path) -> Criteria {
    Criteria::default()
        .with_match_content(true)
        .with_include_roots(vec![root.to_path_buf()])
}

#[test]
fn test_one_call_per_candidate() {
    let dir = tempdir().unwrap();
    for i in 0..6 {
        fs::write(dir.path().join(format!("f{i}")), [i as u8]).unwrap();
    }

    let mut recorder = Recorder::default();
    DuplicateSession::default()
        .find_duplicates(&criteria(dir.path()), &mut recorder)
        .unwrap();

    let expected: Vec<(u64, u64)> = (1..=6).map(|i| (i, 6)).collect();
    assert_eq!(recorder.progress, expected);
    assert_eq!(recorder.discovered, 6);
}

#[test]
fn test_phases_bracket_progress() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"a").unwrap();
    fs::write(dir.path().join("b"), b"b").unwrap();

    let mut recorder = Recorder::default();
    DuplicateSession::default()
        .find_duplicates(&criteria(dir.path()), &mut recorder)
        .unwrap();

    assert_eq!(
        recorder.events,
        vec!["start walking 0", "end walking", "start keying 2", "end keying"]
    );
}

#[test]
fn test_empty_scan_reports_once() {
    let dir = tempdir().unwrap();

    let mut calls = Vec::new();
    DuplicateSession::default()
        .find_duplicates(&criteria(dir.path()), &mut |p: u64, t: u64| calls.push((p, t)))
        .unwrap();

    assert_eq!(calls, vec![(0, 0)]);
}

#[test]
fn test_filtered_files_are_not_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("keep"), b"data").unwrap();
    fs::write(dir.path().join("empty"), b"").unwrap();

    let criteria = criteria(dir.path()).with_ignore_zero_length(true);
    let mut calls = Vec::new();
    DuplicateSession::default()
        .find_duplicates(&criteria, &mut |p: u64, t: u64| calls.push((p, t)))
        .unwrap();

    assert_eq!(calls, vec![(1, 1)]);
}
