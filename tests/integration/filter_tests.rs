use dupefinder::duplicates::{Criteria, DuplicateSession};
use dupefinder::progress::NoProgress;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn by_content(root: &Path) -> Criteria {
    Criteria::default()
        .with_match_size(true)
        .with_match_content(true)
        .with_include_roots(vec![root.to_path_buf()])
}

fn all_paths(criteria: &Criteria) -> Vec<PathBuf> {
    DuplicateSession::default()
        .find_duplicates(criteria, &mut NoProgress)
        .unwrap()
        .iter()
        .flat_map(|g| g.paths())
        .collect()
}

#[test]
fn test_excluded_subtree_never_appears() {
    let dir = tempdir().unwrap();
    write(dir.path(), "keep/a.txt", b"dup");
    write(dir.path(), "keep/b.txt", b"dup");
    let skipped = write(dir.path(), "skip/c.txt", b"dup");

    let criteria = by_content(dir.path()).with_exclude_roots(vec![dir.path().join("skip")]);
    let (groups, summary) = DuplicateSession::default()
        .find_duplicates_with_summary(&criteria, &mut NoProgress)
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert!(!groups[0].contains(&skipped));
    assert_eq!(summary.files_visited, 2);
}

#[test]
fn test_excluded_single_file() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"dup");
    let b = write(dir.path(), "b.txt", b"dup");

    let criteria = by_content(dir.path()).with_exclude_roots(vec![b]);
    assert!(all_paths(&criteria).is_empty());
}

#[test]
fn test_exclusion_is_component_based() {
    let dir = tempdir().unwrap();
    write(dir.path(), "data/a.txt", b"dup");
    write(dir.path(), "data_backup/a.txt", b"dup");

    let criteria = by_content(dir.path()).with_exclude_roots(vec![dir.path().join("data")]);
    let (groups, summary) = DuplicateSession::default()
        .find_duplicates_with_summary(&criteria, &mut NoProgress)
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.candidates, 1);
}

#[test]
fn test_ignore_hidden() {
    let dir = tempdir().unwrap();
    write(dir.path(), ".a", b"dup");
    write(dir.path(), "b", b"dup");
    write(dir.path(), "c", b"dup");

    let paths = all_paths(&by_content(dir.path()).with_ignore_hidden(true));
    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|p| !p.ends_with(".a")));
}

#[test]
fn test_ignore_system() {
    let dir = tempdir().unwrap();
    write(dir.path(), "$MFT", b"dup");
    write(dir.path(), "b", b"dup");

    assert_eq!(all_paths(&by_content(dir.path())).len(), 2);
    assert!(all_paths(&by_content(dir.path()).with_ignore_system(true)).is_empty());
}

#[test]
fn test_ignore_read_only() {
    let dir = tempdir().unwrap();
    let locked = write(dir.path(), "locked", b"dup");
    write(dir.path(), "open", b"dup");
    let mut perms = fs::metadata(&locked).unwrap().permissions();
    perms.set_readonly(true);
    fs::set_permissions(&locked, perms).unwrap();

    // Root may write the file regardless of its mode; the filter must agree.
    let writable = fs::OpenOptions::new().write(true).open(&locked).is_ok();
    let paths = all_paths(&by_content(dir.path()).with_ignore_read_only(true));
    if writable {
        assert_eq!(paths.len(), 2);
    } else {
        assert!(paths.is_empty());
    }

    let mut perms = fs::metadata(&locked).unwrap().permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    fs::set_permissions(&locked, perms).unwrap();
}

#[test]
fn test_ignore_zero_length() {
    let dir = tempdir().unwrap();
    write(dir.path(), "empty1", b"");
    write(dir.path(), "empty2", b"");

    assert_eq!(all_paths(&by_content(dir.path())).len(), 2);
    assert!(all_paths(&by_content(dir.path()).with_ignore_zero_length(true)).is_empty());
}

#[test]
fn test_size_bounds_are_inclusive() {
    let dir = tempdir().unwrap();
    for name in ["s1", "s2"] {
        write(dir.path(), name, b"ab");
    }
    for name in ["m1", "m2"] {
        write(dir.path(), name, b"abcd");
    }
    for name in ["l1", "l2"] {
        write(dir.path(), name, b"abcdefgh");
    }

    let criteria = by_content(dir.path()).with_size_bounds(2, 4);
    let groups = DuplicateSession::default()
        .find_duplicates(&criteria, &mut NoProgress)
        .unwrap();

    let mut sizes: Vec<u64> = groups.iter().map(|g| g.files[0].size).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![2, 4]);

    let criteria = by_content(dir.path()).with_size_bounds(3, 7);
    let groups = DuplicateSession::default()
        .find_duplicates(&criteria, &mut NoProgress)
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files[0].size, 4);
}

#[test]
fn test_skipped_files_are_counted() {
    let dir = tempdir().unwrap();
    write(dir.path(), "tiny", b"x");
    write(dir.path(), "big1", b"xxxxxx");
    write(dir.path(), "big2", b"xxxxxx");

    let criteria = by_content(dir.path()).with_size_bounds(2, u64::MAX);
    let (_, summary) = DuplicateSession::default()
        .find_duplicates_with_summary(&criteria, &mut NoProgress)
        .unwrap();

    assert_eq!(summary.files_visited, 3);
    assert_eq!(summary.files_skipped, 1);
    assert_eq!(summary.candidates, 2);
}
