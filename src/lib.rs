//! dupefinder - duplicate file finder
//!
//! Walks one or more directory trees, keeps the files that pass a
//! configurable filter, and groups them by any combination of name, size,
//! modification time and SHA-256 content digest. Groups can then be
//! thinned out by deleting (or trashing) all but one member.
//!
//! The library core lives in [`scanner`], [`duplicates`] and [`actions`];
//! the remaining modules make up the command-line front end.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{bail, Context};

use crate::actions::{delete_paths, prune_groups, select_all_but_first, validate_preserves_copy};
use crate::cli::{Cli, Commands, DeleteArgs, ScanArgs};
use crate::config::Config;
use crate::duplicates::{DuplicateSession, FinderConfig};
use crate::error::ExitCode;
use crate::progress::Progress;

/// Run the command described by `cli`.
///
/// # Errors
///
/// Returns an error for invalid arguments, an interrupted scan
/// ([`duplicates::FinderError::Interrupted`]) or a failed report write.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    let config = Config::load();

    match &cli.command {
        Commands::Scan(args) => run_scan(&cli, args, &config),
        Commands::Delete(args) => run_delete(args, &config),
    }
}

fn run_scan(cli: &Cli, args: &ScanArgs, config: &Config) -> anyhow::Result<ExitCode> {
    let criteria = args.to_criteria(config);
    if !criteria.has_valid_bounds() {
        bail!(
            "Minimum size {} is larger than maximum size {}",
            criteria.min_bytes,
            criteria.max_bytes
        );
    }
    if !criteria.any_match_enabled() {
        log::warn!("No match properties enabled; every file will land in one group");
    }

    let handler = signal::install_handler().context("Failed to set up Ctrl+C handling")?;
    let mut session = DuplicateSession::new(
        FinderConfig::default()
            .with_hash_buffer_size(config.hash_buffer_size)
            .with_shutdown_flag(handler.get_flag()),
    );

    let mut progress = Progress::new(cli.quiet || args.no_progress);
    let (mut groups, summary) = session.find_duplicates_with_summary(&criteria, &mut progress)?;

    let color = !cli.no_color && io::stdout().is_terminal();
    output::write_report(args.output, &groups, &summary, color, io::stdout().lock())
        .context("Failed to write report")?;

    if groups.is_empty() {
        return Ok(ExitCode::NoDuplicates);
    }

    if args.delete {
        let selected = select_all_but_first(&groups);
        for group in &groups {
            validate_preserves_copy(&selected, &group.paths())?;
        }

        let mode = args.delete_mode(config);
        let prompt = format!("Delete {} files ({:?})?", selected.len(), mode);
        if !args.yes && !confirm(&prompt, io::stdin().lock(), io::stderr())? {
            log::info!("Deletion cancelled");
            return Ok(scan_exit_code(summary.has_errors(), 0));
        }

        let tally = session.delete(&selected, mode);
        prune_groups(&mut groups, &tally.deleted);
        eprintln!("{}", tally.summary());
        log::debug!("{} groups left after deletion", groups.len());
        return Ok(scan_exit_code(summary.has_errors(), tally.failed));
    }

    Ok(scan_exit_code(summary.has_errors(), 0))
}

fn run_delete(args: &DeleteArgs, config: &Config) -> anyhow::Result<ExitCode> {
    let mode = if args.trash {
        actions::DeleteMode::Trash
    } else {
        config.delete_mode
    };
    let tally = delete_paths(&args.paths, mode);
    for (path, reason) in &tally.failures {
        eprintln!("{}: {}", path.display(), reason);
    }
    eprintln!("{}", tally.summary());

    Ok(if tally.all_succeeded() {
        ExitCode::Success
    } else {
        ExitCode::PartialSuccess
    })
}

fn scan_exit_code(scan_errors: bool, delete_failures: u64) -> ExitCode {
    if scan_errors || delete_failures > 0 {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    }
}

/// Ask a yes/no question, defaulting to no.
fn confirm<R: BufRead, W: Write>(prompt: &str, mut input: R, mut out: W) -> io::Result<bool> {
    let mut line = String::new();
    loop {
        write!(out, "{prompt} (y/N): ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "" | "n" | "no" => return Ok(false),
            _ => continue,
        }
    }
}
