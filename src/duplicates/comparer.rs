//! Incremental block-wise comparison engine.
//!
//! # Overview
//!
//! [`FileComparer`] finds groups of identical files while reading as little
//! as possible:
//! 1. **Size partition**: files are bucketed by size. A file whose size is
//!    unique is never opened.
//! 2. **Block refinement**: every bucket becomes an active group. Each
//!    synchronization round reads exactly one block from every member, then
//!    splits the group by the hashes just read. Sub-groups of one are dropped
//!    on the spot and never read again. A group whose members all run out of
//!    data in the same round is a confirmed duplicate group.
//!
//! Active groups live on an explicit worklist rather than the call stack, so
//! very large files cannot exhaust the stack.
//!
//! # Ordering
//!
//! Groups come out in ascending size order. Within one size, groups are
//! ordered by the input position of their first member, and members keep
//! their input order. [`FileComparer::par_compare`] produces exactly the same
//! output as [`FileComparer::compare`].
//!
//! # Example
//!
//! ```
//! use blockdupe::duplicates::FileComparer;
//! use blockdupe::file::MemoryFile;
//! use blockdupe::hasher::HashAlgorithm;
//!
//! let mut files = vec![
//!     MemoryFile::new("a", b"same content".to_vec()),
//!     MemoryFile::new("b", b"other thing!".to_vec()),
//!     MemoryFile::new("c", b"same content".to_vec()),
//! ];
//!
//! let comparer = FileComparer::new(4, HashAlgorithm::Blake3).unwrap();
//! let groups = comparer.find_duplicate_files(&mut files);
//!
//! assert_eq!(groups, vec![vec!["a".to_string(), "c".to_string()]]);
//! ```

use rayon::prelude::*;
use serde::Serialize;

use super::groups::{group_stable, partition_by_size, DuplicateSet, GroupingStats};
use crate::config::ConfigError;
use crate::file::File;
use crate::hasher::BlockHasher;

/// A block read that failed during comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadFailure {
    /// Identity of the file that could not be read
    pub identity: String,
    /// Error message
    pub message: String,
}

/// Statistics from a comparison run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonStats {
    /// Files handed to the comparer
    pub input_files: usize,
    /// Files eliminated because their size is unique
    pub eliminated_by_size: usize,
    /// Size buckets with 2+ files
    pub size_buckets: usize,
    /// Calls to `read_next_block`, including ones that reported exhaustion
    pub read_calls: usize,
    /// Blocks actually read and hashed
    pub blocks_read: usize,
    /// Files dropped after their content diverged from every sibling
    pub eliminated_by_content: usize,
    /// Files dropped because a read failed
    pub failed_files: usize,
    /// Details of each failed read
    pub failures: Vec<ReadFailure>,
    /// Confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Files in confirmed duplicate groups
    pub duplicate_files: usize,
    /// Bytes taken by redundant copies
    pub wasted_bytes: u64,
}

impl ComparisonStats {
    fn from_grouping(grouping: &GroupingStats) -> Self {
        Self {
            input_files: grouping.total_files,
            eliminated_by_size: grouping.eliminated_unique,
            size_buckets: grouping.size_buckets,
            ..Default::default()
        }
    }

    fn absorb(&mut self, bucket: BucketStats) {
        self.read_calls += bucket.read_calls;
        self.blocks_read += bucket.blocks_read;
        self.eliminated_by_content += bucket.eliminated_by_content;
        self.failed_files += bucket.failures.len();
        self.failures.extend(bucket.failures);
    }

    fn finish(&mut self, sets: &[DuplicateSet]) {
        self.duplicate_groups = sets.len();
        self.duplicate_files = sets.iter().map(DuplicateSet::len).sum();
        self.wasted_bytes = sets.iter().map(DuplicateSet::wasted_space).sum();
    }
}

#[derive(Debug, Default)]
struct BucketStats {
    read_calls: usize,
    blocks_read: usize,
    eliminated_by_content: usize,
    failures: Vec<ReadFailure>,
}

/// Groups files by identical content, reading block by block.
#[derive(Debug, Clone)]
pub struct FileComparer<H> {
    block_size: usize,
    hasher: H,
}

impl<H: BlockHasher> FileComparer<H> {
    /// Create a comparer reading `block_size` bytes per round.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroBlockSize`] if `block_size` is 0.
    pub fn new(block_size: usize, hasher: H) -> Result<Self, ConfigError> {
        if block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        Ok(Self { block_size, hasher })
    }

    /// Bytes read from each file per synchronization round.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// The block hasher.
    #[must_use]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Find groups of identical files, returning their identities.
    ///
    /// Only groups with two or more members are returned.
    pub fn find_duplicate_files<F: File>(&self, files: &mut [F]) -> Vec<Vec<String>> {
        let (sets, _) = self.compare(files);
        sets.into_iter().map(|set| set.files).collect()
    }

    /// Find groups of identical files along with run statistics.
    pub fn compare<F: File>(&self, files: &mut [F]) -> (Vec<DuplicateSet>, ComparisonStats) {
        let handles: Vec<&mut F> = files.iter_mut().collect();
        let (buckets, grouping) = partition_by_size(handles, |file| file.size());
        let mut stats = ComparisonStats::from_grouping(&grouping);

        let mut sets = Vec::new();
        for mut bucket in buckets {
            let (bucket_sets, bucket_stats) = self.refine_bucket(bucket.size, &mut bucket.members);
            sets.extend(bucket_sets);
            stats.absorb(bucket_stats);
        }

        stats.finish(&sets);
        log_summary(&stats);
        (sets, stats)
    }

    /// Parallel variant of [`find_duplicate_files`](Self::find_duplicate_files).
    pub fn par_find_duplicate_files<F>(&self, files: &mut [F]) -> Vec<Vec<String>>
    where
        F: File + Send,
        H: Sync,
    {
        let (sets, _) = self.par_compare(files);
        sets.into_iter().map(|set| set.files).collect()
    }

    /// Parallel variant of [`compare`](Self::compare).
    ///
    /// Size buckets share no files, so each one is refined on the rayon pool.
    /// Results are reassembled in bucket order, not completion order.
    pub fn par_compare<F>(&self, files: &mut [F]) -> (Vec<DuplicateSet>, ComparisonStats)
    where
        F: File + Send,
        H: Sync,
    {
        let handles: Vec<&mut F> = files.iter_mut().collect();
        let (buckets, grouping) = partition_by_size(handles, |file| file.size());
        let mut stats = ComparisonStats::from_grouping(&grouping);

        let outcomes: Vec<(Vec<DuplicateSet>, BucketStats)> = buckets
            .into_par_iter()
            .map(|mut bucket| self.refine_bucket(bucket.size, &mut bucket.members))
            .collect();

        let mut sets = Vec::new();
        for (bucket_sets, bucket_stats) in outcomes {
            sets.extend(bucket_sets);
            stats.absorb(bucket_stats);
        }

        stats.finish(&sets);
        log_summary(&stats);
        (sets, stats)
    }

    /// Split one size bucket into confirmed duplicate groups.
    fn refine_bucket<F: File>(
        &self,
        size: u64,
        members: &mut [&mut F],
    ) -> (Vec<DuplicateSet>, BucketStats) {
        let mut stats = BucketStats::default();
        let mut worklist: Vec<Vec<usize>> = vec![(0..members.len()).collect()];
        let mut resolved: Vec<Vec<usize>> = Vec::new();
        let mut round = 0usize;

        log::debug!("Refining {} files of {} bytes", members.len(), size);

        while let Some(group) = worklist.pop() {
            round += 1;
            let mut live = Vec::with_capacity(group.len());
            let mut finished = Vec::new();

            // Synchronization round: one read per member before anything is compared
            for idx in group {
                let file = &mut members[idx];
                stats.read_calls += 1;
                match file.read_next_block(self.block_size, &self.hasher) {
                    Ok(true) => {
                        stats.blocks_read += 1;
                        live.push(idx);
                    }
                    Ok(false) => finished.push(idx),
                    Err(e) => {
                        log::warn!("Dropping {} from comparison: {}", file.identity(), e);
                        stats.failures.push(ReadFailure {
                            identity: file.identity().to_string(),
                            message: e.to_string(),
                        });
                    }
                }
            }

            if live.is_empty() {
                if finished.len() >= 2 {
                    log::trace!("Round {}: {} files exhausted together", round, finished.len());
                    resolved.push(finished);
                } else {
                    stats.eliminated_by_content += finished.len();
                }
                continue;
            }

            if !finished.is_empty() {
                log::trace!(
                    "Round {}: {} files ended before their siblings",
                    round,
                    finished.len()
                );
                stats.eliminated_by_content += finished.len();
            }

            let partitions = group_stable(live, |&idx| *members[idx].block_hash());
            if partitions.len() > 1 {
                log::trace!("Round {}: group split into {}", round, partitions.len());
            }
            for partition in partitions {
                if partition.len() >= 2 {
                    worklist.push(partition);
                } else {
                    stats.eliminated_by_content += partition.len();
                }
            }
        }

        // Members stay in input order inside each group; order groups by their leader
        resolved.sort_by_key(|group| group[0]);

        let sets = resolved
            .into_iter()
            .map(|group| DuplicateSet {
                size,
                files: group
                    .into_iter()
                    .map(|idx| members[idx].identity().to_string())
                    .collect(),
            })
            .collect();

        (sets, stats)
    }
}

fn log_summary(stats: &ComparisonStats) {
    log::info!(
        "Compared {} files: {} duplicate groups ({} files), {} blocks read",
        stats.input_files,
        stats.duplicate_groups,
        stats.duplicate_files,
        stats.blocks_read
    );
    if stats.failed_files > 0 {
        log::warn!("{} files could not be read", stats.failed_files);
    }
}
