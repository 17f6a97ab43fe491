use dupefinder::duplicates::{Criteria, DuplicateSession, FinderConfig, FinderError};
use dupefinder::progress::NoProgress;
use filetime::{set_file_mtime, FileTime};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn criteria(root: &Path) -> Criteria {
    Criteria::default().with_include_roots(vec![root.to_path_buf()])
}

#[test]
fn test_size_and_content_end_to_end() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.txt", &[b'X'; 10]);
    let b = write(dir.path(), "b.txt", &[b'X'; 10]);
    write(dir.path(), "c.txt", &[b'Y'; 10]);

    let criteria = criteria(dir.path())
        .with_match_size(true)
        .with_match_content(true);
    let (groups, summary) = DuplicateSession::default()
        .find_duplicates_with_summary(&criteria, &mut NoProgress)
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths(), vec![a, b]);
    assert_eq!(summary.candidates, 3);
    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(summary.reclaimable_space, 10);
    assert!(!summary.has_errors());
}

#[test]
fn test_content_only_ignores_names() {
    let dir = tempdir().unwrap();
    write(dir.path(), "one/report.pdf", b"same bytes");
    write(dir.path(), "two/copy of report.pdf", b"same bytes");
    write(dir.path(), "two/other.pdf", b"different");

    let criteria = criteria(dir.path()).with_match_content(true);
    let groups = DuplicateSession::default()
        .find_duplicates(&criteria, &mut NoProgress)
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert!(groups[0].digest().is_some());
}

#[test]
fn test_size_only_groups_different_content() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.bin", b"abcd");
    write(dir.path(), "b.bin", b"wxyz");

    let criteria = criteria(dir.path()).with_match_size(true);
    let groups = DuplicateSession::default()
        .find_duplicates(&criteria, &mut NoProgress)
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key.size, Some(4));
    assert_eq!(groups[0].key.digest, None);
}

#[test]
fn test_no_duplicates_is_empty() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a", b"1");
    write(dir.path(), "b", b"22");
    write(dir.path(), "c", b"333");

    let criteria = criteria(dir.path())
        .with_match_size(true)
        .with_match_content(true);
    let groups = DuplicateSession::default()
        .find_duplicates(&criteria, &mut NoProgress)
        .unwrap();

    assert!(groups.is_empty());
}

#[test]
fn test_groups_ordered_by_member_count() {
    let dir = tempdir().unwrap();
    for name in ["a1", "a2"] {
        write(dir.path(), name, b"alpha");
    }
    for name in ["b1", "b2", "b3", "b4", "b5"] {
        write(dir.path(), name, b"bravo!");
    }
    for name in ["c1", "c2"] {
        write(dir.path(), name, b"charlie");
    }
    for name in ["d1", "d2", "d3"] {
        write(dir.path(), name, b"delta-delta");
    }

    let criteria = criteria(dir.path())
        .with_match_size(true)
        .with_match_content(true);
    let groups = DuplicateSession::default()
        .find_duplicates(&criteria, &mut NoProgress)
        .unwrap();

    let lens: Vec<usize> = groups.iter().map(|g| g.len()).collect();
    assert_eq!(lens, vec![5, 3, 2, 2]);
    assert!(groups[2].files[0].path.ends_with("a1"));
    assert!(groups[3].files[0].path.ends_with("c1"));
}

#[test]
fn test_name_matching_is_case_insensitive() {
    let dir = tempdir().unwrap();
    write(dir.path(), "x/Photo.JPG", b"one");
    write(dir.path(), "y/photo.jpg", b"two two");
    write(dir.path(), "z/unrelated.jpg", b"one");

    let criteria = criteria(dir.path()).with_match_name(true);
    let groups = DuplicateSession::default()
        .find_duplicates(&criteria, &mut NoProgress)
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key.name.as_deref(), Some("photo.jpg"));
}

#[test]
fn test_date_matching() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a", b"1");
    let b = write(dir.path(), "b", b"2");
    let c = write(dir.path(), "c", b"3");
    let stamp = FileTime::from_unix_time(1_600_000_000, 0);
    set_file_mtime(&a, stamp).unwrap();
    set_file_mtime(&b, stamp).unwrap();
    set_file_mtime(&c, FileTime::from_unix_time(1_700_000_000, 0)).unwrap();

    let criteria = criteria(dir.path()).with_match_date(true);
    let groups = DuplicateSession::default()
        .find_duplicates(&criteria, &mut NoProgress)
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths(), vec![a, b]);
    assert_eq!(groups[0].key.modified_ms, Some(1_600_000_000_000));
}

#[test]
fn test_overlapping_roots_walk_each_file_once() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"dup");
    write(dir.path(), "sub/b.txt", b"dup");

    let criteria = Criteria::default()
        .with_match_content(true)
        .with_include_roots(vec![dir.path().join("sub"), dir.path().to_path_buf()]);
    let (groups, summary) = DuplicateSession::default()
        .find_duplicates_with_summary(&criteria, &mut NoProgress)
        .unwrap();

    assert_eq!(summary.roots_walked, 1);
    assert_eq!(summary.candidates, 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}

#[test]
fn test_multiple_roots() {
    let one = tempdir().unwrap();
    let two = tempdir().unwrap();
    write(one.path(), "a.txt", b"shared");
    write(two.path(), "b.txt", b"shared");

    let criteria = Criteria::default()
        .with_match_content(true)
        .with_include_roots(vec![one.path().to_path_buf(), two.path().to_path_buf()]);
    let (groups, summary) = DuplicateSession::default()
        .find_duplicates_with_summary(&criteria, &mut NoProgress)
        .unwrap();

    assert_eq!(summary.roots_walked, 2);
    assert_eq!(groups.len(), 1);
    assert!(groups[0].files[0].path.starts_with(one.path()));
}

#[test]
fn test_missing_root_is_skipped() {
    let dir = tempdir().unwrap();
    let elsewhere = tempdir().unwrap();
    write(dir.path(), "a", b"z");
    write(dir.path(), "b", b"z");

    let criteria = Criteria::default()
        .with_match_content(true)
        .with_include_roots(vec![elsewhere.path().join("missing"), dir.path().to_path_buf()]);
    let (groups, summary) = DuplicateSession::default()
        .find_duplicates_with_summary(&criteria, &mut NoProgress)
        .unwrap();

    assert_eq!(summary.roots_walked, 1);
    assert_eq!(groups.len(), 1);
}

#[test]
fn test_no_roots_is_empty() {
    let groups = DuplicateSession::default()
        .find_duplicates(&Criteria::default().with_match_size(true), &mut NoProgress)
        .unwrap();
    assert!(groups.is_empty());
}

#[test]
fn test_cancelled_session_is_interrupted() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a", b"z");

    let flag = Arc::new(AtomicBool::new(true));
    let mut session = DuplicateSession::new(FinderConfig::default().with_shutdown_flag(flag));
    let result = session.find_duplicates(&criteria(dir.path()).with_match_size(true), &mut NoProgress);

    assert!(matches!(result, Err(FinderError::Interrupted)));
}

#[test]
fn test_cancel_during_keying() {
    let dir = tempdir().unwrap();
    for i in 0..5 {
        write(dir.path(), &format!("f{i}"), b"same");
    }

    let mut session = DuplicateSession::default();
    let cancel = session.cancel_handle();
    let mut seen = 0;
    let result = session.find_duplicates(
        &criteria(dir.path()).with_match_content(true),
        &mut |processed: u64, _total: u64| {
            seen = processed;
            if processed == 2 {
                cancel.store(true, std::sync::atomic::Ordering::SeqCst);
            }
        },
    );

    assert!(matches!(result, Err(FinderError::Interrupted)));
    assert_eq!(seen, 2);
}

#[test]
fn test_session_scans_again_after_cancel() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a", b"same");
    write(dir.path(), "b", b"same");
    let criteria = criteria(dir.path()).with_match_content(true);

    let mut session = DuplicateSession::default();
    session.cancel();
    let first = session.find_duplicates(&criteria, &mut NoProgress);
    assert!(matches!(first, Err(FinderError::Interrupted)));

    let groups = session.find_duplicates(&criteria, &mut NoProgress).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}

#[test]
fn test_file_removed_before_hashing_is_isolated() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a", b"same");
    let b = write(dir.path(), "b", b"same");
    let c = write(dir.path(), "c", b"same");

    let doomed = c.clone();
    let (groups, summary) = DuplicateSession::default()
        .find_duplicates_with_summary(
            &criteria(dir.path()).with_match_content(true),
            &mut |processed: u64, _total: u64| {
                if processed == 1 {
                    fs::remove_file(&doomed).unwrap();
                }
            },
        )
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths(), vec![a, b]);
    assert!(groups.iter().all(|g| !g.paths().contains(&c)));
    assert_eq!(summary.candidates, 3);
    assert_eq!(summary.digest_failures, 1);
}

#[test]
fn test_small_buffer_gives_same_groups() {
    let dir = tempdir().unwrap();
    let big = vec![7u8; 10_000];
    write(dir.path(), "a", &big);
    write(dir.path(), "b", &big);

    let criteria = criteria(dir.path()).with_match_content(true);
    let default_groups = DuplicateSession::default()
        .find_duplicates(&criteria, &mut NoProgress)
        .unwrap();
    let small_groups = DuplicateSession::new(FinderConfig::default().with_hash_buffer_size(3))
        .find_duplicates(&criteria, &mut NoProgress)
        .unwrap();

    assert_eq!(default_groups, small_groups);
}
