//! Output formatters for comparison results.
//!
//! This module provides different output formats for duplicate groups:
//! - Plain text, one path per line with a blank line between groups
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```
//! use blockdupe::cli::OutputFormat;
//! use blockdupe::duplicates::FileComparer;
//! use blockdupe::file::MemoryFile;
//! use blockdupe::hasher::HashAlgorithm;
//! use blockdupe::output::write_report;
//!
//! let mut files = vec![
//!     MemoryFile::new("a", b"xyz".to_vec()),
//!     MemoryFile::new("b", b"xyz".to_vec()),
//! ];
//! let comparer = FileComparer::new(2, HashAlgorithm::Xxh3).unwrap();
//! let (sets, stats) = comparer.compare(&mut files);
//!
//! let mut out = Vec::new();
//! write_report(OutputFormat::Text, &sets, &stats, &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "a\nb\n");
//! ```

pub mod json;
pub mod text;

use std::io::Write;

pub use json::JsonOutput;
pub use text::TextOutput;

use crate::cli::OutputFormat;
use crate::duplicates::{ComparisonStats, DuplicateSet};

/// Errors that can occur while writing a report.
#[derive(thiserror::Error, Debug)]
pub enum OutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error while writing report: {0}")]
    Io(#[from] std::io::Error),
}

/// Write `sets` to `writer` in the requested format.
///
/// # Errors
///
/// Returns [`OutputError`] if serialization or writing fails.
pub fn write_report<W: Write>(
    format: OutputFormat,
    sets: &[DuplicateSet],
    stats: &ComparisonStats,
    writer: &mut W,
) -> Result<(), OutputError> {
    match format {
        OutputFormat::Text => TextOutput::new(sets).write_to(writer)?,
        OutputFormat::Json => JsonOutput::new(sets, stats).write_to(writer)?,
    }
    writer.flush()?;
    Ok(())
}
