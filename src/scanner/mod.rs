//! Scanner module for directory traversal.
//!
//! This module provides functionality for:
//! - Parallel directory walking using jwalk
//! - Depth limits and excluded directories
//! - Case-insensitive file name masks
//! - Size filtering
//!
//! The scanner only discovers candidates. Content is never read here: the
//! entries are turned into [`FsFile`](crate::file::FsFile) handles and handed
//! to the comparer.
//!
//! # Example
//!
//! ```no_run
//! use blockdupe::scanner::{Walker, WalkerConfig};
//! use std::path::PathBuf;
//!
//! let config = WalkerConfig {
//!     max_depth: Some(0),             // Only the listed directories
//!     masks: vec!["*.jpg".to_string()],
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(vec![PathBuf::from(".")], config).unwrap();
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod walker;

use std::path::PathBuf;

pub use walker::Walker;

/// A discovered regular file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Levels of subdirectories to descend into.
    /// `Some(0)` scans only the entries directly inside each root,
    /// `None` is unlimited.
    pub max_depth: Option<usize>,

    /// Minimum file size to include (in bytes).
    /// Defaults to 1 so that empty files are skipped.
    pub min_size: u64,

    /// Maximum file size to include (in bytes).
    pub max_size: Option<u64>,

    /// Directories to skip, together with everything below them.
    pub exclude: Vec<PathBuf>,

    /// Glob patterns matched case-insensitively against file names.
    /// Empty means every file is a candidate.
    pub masks: Vec<String>,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_size: 1,
            max_size: None,
            exclude: Vec::new(),
            masks: Vec::new(),
            skip_hidden: false,
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A file name mask could not be compiled.
    #[error("Invalid mask '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Why it was rejected
        message: String,
    },

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
