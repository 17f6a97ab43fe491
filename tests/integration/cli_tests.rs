use clap::Parser;
use dupefinder::cli::Cli;
use dupefinder::error::ExitCode;
use dupefinder::run_app;
use std::fs;
use tempfile::tempdir;

fn run(args: &[&str]) -> ExitCode {
    let mut argv = vec!["dupefinder", "-q"];
    argv.extend_from_slice(args);
    run_app(Cli::try_parse_from(argv).unwrap()).unwrap()
}

#[test]
fn test_scan_without_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"one").unwrap();
    fs::write(dir.path().join("b"), b"two!").unwrap();
    let root = dir.path().to_str().unwrap();

    let code = run(&["scan", root, "--by", "size,content", "--no-progress", "-o", "json"]);
    assert_eq!(code, ExitCode::NoDuplicates);
}

#[test]
fn test_scan_and_delete_keeps_first() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a.txt");
    let second = dir.path().join("b.txt");
    fs::write(&first, b"XXXXXXXXXX").unwrap();
    fs::write(&second, b"XXXXXXXXXX").unwrap();
    let root = dir.path().to_str().unwrap();

    let code = run(&[
        "scan",
        root,
        "--by",
        "size,content",
        "--no-progress",
        "-o",
        "csv",
        "--delete",
        "--yes",
    ]);

    assert_eq!(code, ExitCode::Success);
    assert!(first.exists());
    assert!(!second.exists());
}

#[test]
fn test_delete_subcommand_partial_success() {
    let dir = tempdir().unwrap();
    let present = dir.path().join("present");
    fs::write(&present, b"x").unwrap();
    let missing = dir.path().join("missing");

    let code = run(&[
        "delete",
        present.to_str().unwrap(),
        missing.to_str().unwrap(),
    ]);

    assert_eq!(code, ExitCode::PartialSuccess);
    assert!(!present.exists());
}

#[test]
fn test_inverted_size_bounds_are_rejected() {
    let dir = tempdir().unwrap();
    let cli = Cli::try_parse_from([
        "dupefinder",
        "-q",
        "scan",
        dir.path().to_str().unwrap(),
        "--min-size",
        "2KB",
        "--max-size",
        "1KB",
        "--no-progress",
    ])
    .unwrap();

    let err = run_app(cli).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
}
