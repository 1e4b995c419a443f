//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size partitioning (phase 1)
//! - Block-by-block refinement of candidate groups (phase 2)
//! - Duplicate group bookkeeping

pub mod comparer;
pub mod groups;

pub use comparer::{ComparisonStats, FileComparer, ReadFailure};
pub use groups::{group_stable, partition_by_size, DuplicateSet, GroupingStats, SizeBucket};
