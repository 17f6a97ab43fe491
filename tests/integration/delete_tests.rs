use dupefinder::actions::{
    delete_file, delete_paths, prune_groups, select_all_but_first, DeleteError, DeleteMode,
};
use dupefinder::duplicates::{Criteria, DuplicateSession};
use dupefinder::progress::NoProgress;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_second_delete_of_same_path_fails() {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "victim.txt", b"bye");
    let mut session = DuplicateSession::default();

    let first = session.delete(&[path.clone()], DeleteMode::Permanent);
    assert_eq!((first.succeeded, first.failed), (1, 0));
    assert_eq!(first.bytes_freed, 3);
    assert!(!path.exists());

    let second = session.delete(&[path.clone()], DeleteMode::Permanent);
    assert_eq!((second.succeeded, second.failed), (0, 1));
    assert_eq!(second.failures[0].0, path);
}

#[test]
fn test_failures_do_not_stop_the_batch() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a", b"1");
    let missing = dir.path().join("missing");
    let c = write(dir.path(), "c", b"333");

    let tally = delete_paths(&[a.clone(), missing, c.clone()], DeleteMode::Permanent);

    assert_eq!(tally.succeeded, 2);
    assert_eq!(tally.failed, 1);
    assert_eq!(tally.total(), 3);
    assert_eq!(tally.deleted, vec![a, c]);
    assert_eq!(tally.bytes_freed, 4);
    assert!(!tally.all_succeeded());
}

#[test]
fn test_delete_missing_file_is_not_found() {
    let dir = tempdir().unwrap();
    let result = delete_file(&dir.path().join("nope"), DeleteMode::Permanent);
    assert!(matches!(result, Err(DeleteError::NotFound(_))));
}

#[test]
fn test_scan_delete_prune_cycle() {
    let dir = tempdir().unwrap();
    let keep = write(dir.path(), "a.txt", b"twin");
    write(dir.path(), "b.txt", b"twin");
    write(dir.path(), "c.txt", b"twin");
    write(dir.path(), "d.txt", b"solo");

    let criteria = Criteria::default()
        .with_match_content(true)
        .with_include_roots(vec![dir.path().to_path_buf()]);
    let mut session = DuplicateSession::default();
    let mut groups = session.find_duplicates(&criteria, &mut NoProgress).unwrap();
    assert_eq!(groups.len(), 1);

    let selected = select_all_but_first(&groups);
    assert_eq!(selected.len(), 2);
    assert!(!selected.contains(&keep));

    let tally = session.delete(&selected, DeleteMode::Permanent);
    assert!(tally.all_succeeded());
    prune_groups(&mut groups, &tally.deleted);
    assert!(groups.is_empty());
    assert!(keep.exists());

    let rescanned = session.find_duplicates(&criteria, &mut NoProgress).unwrap();
    assert!(rescanned.is_empty());
}
