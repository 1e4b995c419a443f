//! JSON output formatter for comparison results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "groups": [
//!     {
//!       "size": 1024,
//!       "files": ["/path/to/file1.txt", "/path/to/file2.txt"]
//!     }
//!   ],
//!   "summary": {
//!     "duplicate_groups": 1,
//!     "duplicate_files": 2,
//!     "wasted_bytes": 1024,
//!     "blocks_read": 2,
//!     "files_compared": 57
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use super::OutputError;
use crate::duplicates::{ComparisonStats, DuplicateSet};

/// Summary statistics in JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonSummary {
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Files in all duplicate groups, originals included
    pub duplicate_files: usize,
    /// Bytes taken by redundant copies
    pub wasted_bytes: u64,
    /// Blocks read and hashed during comparison
    pub blocks_read: usize,
    /// Files handed to the comparer
    pub files_compared: usize,
}

impl JsonSummary {
    /// Create a JSON summary from comparison statistics.
    #[must_use]
    pub fn from_stats(stats: &ComparisonStats) -> Self {
        Self {
            duplicate_groups: stats.duplicate_groups,
            duplicate_files: stats.duplicate_files,
            wasted_bytes: stats.wasted_bytes,
            blocks_read: stats.blocks_read,
            files_compared: stats.input_files,
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// Duplicate groups in engine order
    pub groups: &'a [DuplicateSet],
    /// Run statistics
    pub summary: JsonSummary,
}

impl<'a> JsonOutput<'a> {
    /// Create a new JSON output from duplicate groups and statistics.
    #[must_use]
    pub fn new(groups: &'a [DuplicateSet], stats: &ComparisonStats) -> Self {
        Self {
            groups,
            summary: JsonSummary::from_stats(stats),
        }
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), OutputError> {
        let json = self.to_json_pretty()?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<DuplicateSet>, ComparisonStats) {
        let sets = vec![DuplicateSet {
            size: 1024,
            files: vec!["/x/a".to_string(), "/x/b".to_string()],
        }];
        let stats = ComparisonStats {
            input_files: 57,
            blocks_read: 2,
            duplicate_groups: 1,
            duplicate_files: 2,
            wasted_bytes: 1024,
            ..Default::default()
        };
        (sets, stats)
    }

    #[test]
    fn test_json_schema() {
        let (sets, stats) = sample();
        let output = JsonOutput::new(&sets, &stats);
        let value: serde_json::Value =
            serde_json::from_str(&output.to_json_pretty().unwrap()).unwrap();

        assert_eq!(value["groups"][0]["size"], 1024);
        assert_eq!(value["groups"][0]["files"][1], "/x/b");
        assert_eq!(value["summary"]["duplicate_groups"], 1);
        assert_eq!(value["summary"]["duplicate_files"], 2);
        assert_eq!(value["summary"]["wasted_bytes"], 1024);
        assert_eq!(value["summary"]["blocks_read"], 2);
        assert_eq!(value["summary"]["files_compared"], 57);
    }

    #[test]
    fn test_empty_groups_is_empty_array() {
        let output = JsonOutput::new(&[], &ComparisonStats::default());
        let value: serde_json::Value =
            serde_json::from_str(&output.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["groups"], serde_json::json!([]));
        assert_eq!(value["summary"]["files_compared"], 0);
    }

    #[test]
    fn test_write_to_ends_with_newline() {
        let (sets, stats) = sample();
        let mut out = Vec::new();
        JsonOutput::new(&sets, &stats).write_to(&mut out).unwrap();
        assert!(out.ends_with(b"}\n"));
    }
}
