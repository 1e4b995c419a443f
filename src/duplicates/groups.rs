//! Group bookkeeping for the comparison engine.
//!
//! # Overview
//!
//! Both phases of duplicate detection split a sequence into classes by key:
//! first by file size, then by block hash. [`group_stable`] is the shared
//! primitive. It keeps classes in the order their key was first seen and
//! members in their original relative order, which is what makes the
//! engine's output order deterministic.
//!
//! # Example
//!
//! ```
//! use blockdupe::duplicates::group_stable;
//!
//! let words = ["apple", "bob", "avocado", "banana", "cherry"];
//! let groups = group_stable(words, |w| w.as_bytes()[0]);
//!
//! assert_eq!(
//!     groups,
//!     vec![vec!["apple", "avocado"], vec!["bob", "banana"], vec!["cherry"]]
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// Group items by key, preserving first-seen key order and member order.
///
/// Runs in O(n) with one hash map lookup per item.
pub fn group_stable<T, K, I, F>(items: I, mut key: F) -> Vec<Vec<T>>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Vec<T>> = Vec::new();

    for item in items {
        let k = key(&item);
        match slots.get(&k) {
            Some(&slot) => groups[slot].push(item),
            None => {
                slots.insert(k, groups.len());
                groups.push(vec![item]);
            }
        }
    }

    groups
}

/// Files of one size that may be duplicates of each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeBucket<T> {
    /// Size shared by every member, in bytes
    pub size: u64,
    /// Members in their original relative order
    pub members: Vec<T>,
}

impl<T> SizeBucket<T> {
    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the bucket has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Statistics from the size partition phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Number of distinct file sizes
    pub unique_sizes: usize,
    /// Files eliminated because no other file shares their size
    pub eliminated_unique: usize,
    /// Files left in buckets of 2+
    pub potential_duplicates: usize,
    /// Number of buckets with 2+ files
    pub size_buckets: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size alone.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Partition items by size (phase 1 of duplicate detection).
///
/// Buckets holding a single item are dropped: a file with a unique size
/// cannot be a duplicate of anything. The remaining buckets are returned in
/// ascending size order.
pub fn partition_by_size<T, F>(items: Vec<T>, size_of: F) -> (Vec<SizeBucket<T>>, GroupingStats)
where
    F: Fn(&T) -> u64,
{
    let mut stats = GroupingStats {
        total_files: items.len(),
        ..Default::default()
    };

    let groups = group_stable(items, |item| size_of(item));
    stats.unique_sizes = groups.len();

    let mut buckets: Vec<SizeBucket<T>> = Vec::with_capacity(groups.len());
    for members in groups {
        if members.len() < 2 {
            stats.eliminated_unique += members.len();
            continue;
        }
        let size = size_of(&members[0]);
        stats.potential_duplicates += members.len();
        stats.size_buckets += 1;
        log::trace!("Size bucket {} bytes: {} candidates", size, members.len());
        buckets.push(SizeBucket { size, members });
    }

    buckets.sort_by_key(|bucket| bucket.size);

    log::debug!(
        "Size partition: {} files -> {} candidates in {} buckets ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.size_buckets,
        stats.elimination_rate()
    );

    (buckets, stats)
}

/// A confirmed group of identical files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateSet {
    /// Size of each file in bytes
    pub size: u64,
    /// File identities, in original input order
    pub files: Vec<String>,
}

impl DuplicateSet {
    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of redundant copies (all but one).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Bytes taken by the redundant copies.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }
}
