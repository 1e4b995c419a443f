//! blockdupe - Incremental Duplicate File Finder
//!
//! Finds groups of files with identical content while reading as little as
//! possible. Files are grouped by size, then compared one block at a time;
//! a file stops being read the moment its content diverges from every other
//! candidate.
//!
//! The engine ([`duplicates::FileComparer`]) works against the
//! [`file::File`] trait, so it can compare anything that yields block
//! hashes: real files ([`file::FsFile`]), in-memory buffers
//! ([`file::MemoryFile`]), or test doubles.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod file;
pub mod hasher;
pub mod logging;
pub mod output;
pub mod scanner;

use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::Context;

use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::{ComparisonStats, DuplicateSet, FileComparer};
use crate::error::ExitCode;
use crate::file::FsFile;
use crate::scanner::Walker;

/// Scan `paths` and compare every candidate file.
///
/// Entries the walker cannot read are logged and skipped.
///
/// # Errors
///
/// Fails if the configuration is invalid or a root cannot be scanned.
pub fn scan_paths(
    paths: Vec<PathBuf>,
    config: &Config,
) -> anyhow::Result<(Vec<DuplicateSet>, ComparisonStats)> {
    config.validate()?;

    let walker = Walker::new(paths, config.walker_config())?;
    let mut files: Vec<FsFile> = Vec::new();
    let mut skipped = 0usize;
    for entry in walker.walk() {
        match entry {
            Ok(entry) => files.push(FsFile::from_entry(entry)),
            Err(e) => {
                skipped += 1;
                log::warn!("Skipping: {}", e);
            }
        }
    }
    log::info!(
        "Found {} candidate files under {} roots ({} skipped)",
        files.len(),
        walker.roots().len(),
        skipped
    );

    let comparer = FileComparer::new(config.block_size, config.algorithm)?;
    log::debug!(
        "Comparing with {} byte blocks, {} hashes{}",
        comparer.block_size(),
        comparer.hasher(),
        if config.parallel { ", parallel" } else { "" }
    );
    if !config.algorithm.is_cryptographic() {
        log::debug!(
            "{} is not collision resistant; distinct blocks may compare equal",
            config.algorithm
        );
    }

    let result = if config.parallel {
        comparer.par_compare(&mut files)
    } else {
        comparer.compare(&mut files)
    };
    Ok(result)
}

/// Run the command line application.
///
/// # Errors
///
/// Fails if configuration cannot be loaded, a root cannot be scanned, or the
/// report cannot be written.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_cli(&cli);

    let (sets, stats) = scan_paths(cli.paths, &config)?;

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    output::write_report(config.output, &sets, &stats, &mut writer)
        .context("Failed to write report")?;

    Ok(ExitCode::from_group_count(sets.len()))
}
