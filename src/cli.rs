//! Command-line interface definitions for blockdupe.
//!
//! This module defines all CLI arguments using the clap derive API. Flags that
//! are also configurable through the config file are `Option`s so that
//! [`Config::apply_cli`](crate::config::Config::apply_cli) can tell whether
//! the user actually passed them.
//!
//! # Example
//!
//! ```bash
//! # Find duplicates under two directories
//! blockdupe ~/Photos /mnt/backup/Photos
//!
//! # Only JPEGs, no deeper than one level, 64 KiB blocks
//! blockdupe ~/Photos -m '*.jpg' -d 1 -b 64KiB
//!
//! # JSON report, xxh3 block hashes, parallel comparison
//! blockdupe ~/Downloads -a xxh3 --parallel -o json
//!
//! # Verbose mode for debugging
//! blockdupe -v ~/Downloads
//! ```

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::hasher::HashAlgorithm;

/// Find duplicate files by comparing their content block by block.
///
/// Files are first grouped by size, then read one block at a time. A file
/// stops being read as soon as its content differs from every other file of
/// the same size.
#[derive(Debug, Parser)]
#[command(name = "blockdupe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directories to scan for duplicates
    #[arg(value_name = "PATH", required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// Directories to exclude from the scan (can be specified multiple times)
    #[arg(short, long, value_name = "DIR")]
    pub exclude: Vec<PathBuf>,

    /// Levels of subdirectories to descend into (0 = only the given directories)
    #[arg(short, long, value_name = "N")]
    pub depth: Option<usize>,

    /// Minimum file size to consider (e.g., 1KB, 1MB, 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Maximum file size to consider (e.g., 1KB, 1MB, 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// File name masks, matched case-insensitively (can be specified multiple times)
    #[arg(short, long = "mask", value_name = "GLOB")]
    pub masks: Vec<String>,

    /// Bytes read from each file per comparison round (e.g., 4KiB, 1MiB)
    #[arg(short, long, value_name = "SIZE", value_parser = parse_block_size)]
    pub block_size: Option<usize>,

    /// Hash algorithm applied to each block
    #[arg(short, long, value_enum, value_name = "ALG")]
    pub algorithm: Option<HashAlgorithm>,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Compare size groups in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Path to a TOML config file
    ///
    /// If not specified, config.toml in the platform config directory is used
    /// when present.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Output format for scan results.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One path per line, groups separated by a blank line
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use blockdupe::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    // Find where the number ends and the suffix begins
    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    if num < 0.0 {
        return Err("Size cannot be negative".to_string());
    }

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}

/// Parse a block size: a [`parse_size`] value that is non-zero and fits in memory.
///
/// # Errors
///
/// Returns an error for anything [`parse_size`] rejects, for zero, and for
/// sizes that do not fit in `usize`.
pub fn parse_block_size(s: &str) -> Result<usize, String> {
    let bytes = parse_size(s)?;
    if bytes == 0 {
        return Err("Block size must be greater than zero".to_string());
    }
    usize::try_from(bytes).map_err(|_| format!("Block size too large: {bytes} bytes"))
}
