use dupefinder::duplicates::{Criteria, FinderConfig, FinderError, ScanEvent, ScanWorker};
use dupefinder::progress::ScanPhase;
use std::fs;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_worker_reports_events_then_result() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"same").unwrap();
    fs::write(dir.path().join("b"), b"same").unwrap();
    fs::write(dir.path().join("c"), b"diff").unwrap();

    let criteria = Criteria::default()
        .with_match_content(true)
        .with_include_roots(vec![dir.path().to_path_buf()]);
    let worker = ScanWorker::spawn(FinderConfig::default(), criteria).unwrap();

    let mut progress = Vec::new();
    let mut phases = Vec::new();
    let mut outcome = None;
    for event in worker.events().iter() {
        match event {
            ScanEvent::PhaseStarted { phase, .. } => phases.push(phase),
            ScanEvent::Progress { processed, total } => progress.push((processed, total)),
            ScanEvent::Discovered { .. } => {}
            ScanEvent::Finished(result) => {
                outcome = Some(result);
                break;
            }
        }
    }

    assert_eq!(phases, vec![ScanPhase::Walking, ScanPhase::Keying]);
    assert_eq!(progress, vec![(1, 3), (2, 3), (3, 3)]);
    let (groups, summary) = outcome.unwrap().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(summary.candidates, 3);
}

#[test]
fn test_worker_wait() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("x"), b"1").unwrap();
    fs::write(dir.path().join("y"), b"1").unwrap();

    let criteria = Criteria::default()
        .with_match_size(true)
        .with_include_roots(vec![dir.path().to_path_buf()]);
    let worker = ScanWorker::spawn(FinderConfig::default(), criteria).unwrap();

    let (groups, _) = worker.wait().unwrap();
    assert_eq!(groups.len(), 1);
}

#[test]
fn test_worker_cancelled_up_front() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("x"), b"1").unwrap();

    let config = FinderConfig::default().with_shutdown_flag(Arc::new(AtomicBool::new(true)));
    let criteria = Criteria::default()
        .with_match_size(true)
        .with_include_roots(vec![dir.path().to_path_buf()]);
    let worker = ScanWorker::spawn(config, criteria).unwrap();

    assert!(matches!(worker.wait(), Err(FinderError::Interrupted)));
}
