//! In-memory [`File`] implementation.

use super::{BlockHash, File, HashError};
use crate::hasher::BlockHasher;

/// A file backed by a byte buffer.
///
/// Behaves exactly like [`FsFile`](super::FsFile) with respect to block
/// boundaries and exhaustion, without touching the filesystem.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    identity: String,
    data: Vec<u8>,
    cursor: usize,
    hash: BlockHash,
    exhausted: bool,
    reads: usize,
}

impl MemoryFile {
    /// Create a file labelled `identity` holding `data`.
    #[must_use]
    pub fn new(identity: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            identity: identity.into(),
            data,
            cursor: 0,
            hash: BlockHash::default(),
            exhausted: false,
            reads: 0,
        }
    }

    /// Number of blocks successfully read so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Byte offset of the next unread block.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl File for MemoryFile {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_next_block(
        &mut self,
        block_size: usize,
        hasher: &dyn BlockHasher,
    ) -> Result<bool, HashError> {
        if self.exhausted || self.cursor >= self.data.len() {
            self.exhausted = true;
            return Ok(false);
        }
        let end = self.cursor.saturating_add(block_size).min(self.data.len());
        self.hash = hasher.hash_block(&self.data[self.cursor..end]);
        self.cursor = end;
        self.reads += 1;
        Ok(true)
    }

    fn block_hash(&self) -> &BlockHash {
        &self.hash
    }

    fn identity(&self) -> &str {
        &self.identity
    }
}
