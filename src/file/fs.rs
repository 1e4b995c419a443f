//! Filesystem-backed [`File`] implementation.

use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::{BlockHash, File, HashError};
use crate::hasher::BlockHasher;
use crate::scanner::FileEntry;

/// A file on disk, read one block at a time.
///
/// Only the read offset is kept between calls. Every block opens the file,
/// seeks to the offset, reads and closes it again, so a file the comparer
/// abandons mid-way holds no descriptor and no buffer.
#[derive(Debug)]
pub struct FsFile {
    path: PathBuf,
    identity: String,
    size: u64,
    offset: u64,
    hash: BlockHash,
    state: ReadState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    Reading,
    Exhausted,
    Failed,
}

impl FsFile {
    /// Create a file handle for `path` with a known `size`.
    ///
    /// Nothing is opened until the first block is requested.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        let path = path.into();
        let identity = path.display().to_string();
        Self {
            path,
            identity,
            size,
            offset: 0,
            hash: BlockHash::default(),
            state: ReadState::Reading,
        }
    }

    /// Create a file handle from a scanned entry.
    #[must_use]
    pub fn from_entry(entry: FileEntry) -> Self {
        Self::new(entry.path, entry.size)
    }

    /// Path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of bytes consumed so far.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Whether the end of the file has been reached.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state == ReadState::Exhausted
    }

    fn fail(&mut self, source: std::io::Error) -> HashError {
        self.state = ReadState::Failed;
        HashError::from_io(self.path.clone(), source)
    }

    /// Read up to `block_size` bytes at the current offset into `buffer`,
    /// retrying short reads. The handle is closed before returning.
    fn read_block(&self, buffer: &mut [u8]) -> std::io::Result<usize> {
        let mut handle = std::fs::File::open(&self.path)?;
        if self.offset > 0 {
            handle.seek(SeekFrom::Start(self.offset))?;
        }
        let mut filled = 0;
        while filled < buffer.len() {
            match handle.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl File for FsFile {
    fn size(&self) -> u64 {
        self.size
    }

    fn read_next_block(
        &mut self,
        block_size: usize,
        hasher: &dyn BlockHasher,
    ) -> Result<bool, HashError> {
        match self.state {
            ReadState::Exhausted => return Ok(false),
            ReadState::Failed => {
                return Err(HashError::Io {
                    path: self.path.clone(),
                    source: std::io::Error::other("previous read failed"),
                })
            }
            ReadState::Reading => {}
        }

        let mut buffer = vec![0u8; block_size];
        let filled = self.read_block(&mut buffer).map_err(|e| self.fail(e))?;
        if filled == 0 {
            log::trace!("Exhausted {} at {} bytes", self.identity, self.offset);
            self.state = ReadState::Exhausted;
            return Ok(false);
        }

        self.offset += filled as u64;
        self.hash = hasher.hash_block(&buffer[..filled]);
        Ok(true)
    }

    fn block_hash(&self) -> &BlockHash {
        &self.hash
    }

    fn identity(&self) -> &str {
        &self.identity
    }
}
