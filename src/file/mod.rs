//! The file capability consumed by the comparison engine.
//!
//! # Overview
//!
//! A [`File`] reports its size up front and yields the hash of its content
//! one block at a time. The engine in [`crate::duplicates`] never sees raw
//! bytes; it only compares [`BlockHash`] values produced through a
//! [`BlockHasher`](crate::hasher::BlockHasher).
//!
//! Two implementations ship with the crate:
//! - [`FsFile`]: a real filesystem entry, opened lazily
//! - [`MemoryFile`]: an in-memory byte buffer, useful for tests and embedding
//!
//! # Example
//!
//! ```
//! use blockdupe::file::{File, MemoryFile};
//! use blockdupe::hasher::HashAlgorithm;
//!
//! let mut file = MemoryFile::new("a", b"hello world".to_vec());
//! let hasher = HashAlgorithm::Blake3;
//!
//! assert_eq!(file.size(), 11);
//! assert!(file.read_next_block(8, &hasher).unwrap());
//! assert!(file.read_next_block(8, &hasher).unwrap());
//! assert!(!file.read_next_block(8, &hasher).unwrap());
//! ```

pub mod fs;
pub mod memory;

use std::fmt;
use std::path::PathBuf;

use crate::hasher::BlockHasher;

pub use fs::FsFile;
pub use memory::MemoryFile;

/// Maximum width of a block hash in bytes.
pub const MAX_HASH_LEN: usize = 32;

/// Hash of a single block of file content.
///
/// Stored inline with a length so that digests of different widths
/// (4-byte CRC32 up to 32-byte BLAKE3) share one allocation-free type.
/// Two hashes are equal only if both length and bytes are equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockHash {
    bytes: [u8; MAX_HASH_LEN],
    len: u8,
}

impl BlockHash {
    /// Build a hash from raw digest bytes.
    ///
    /// Digests longer than [`MAX_HASH_LEN`] are truncated.
    #[must_use]
    pub fn from_bytes(digest: &[u8]) -> Self {
        let len = digest.len().min(MAX_HASH_LEN);
        let mut bytes = [0u8; MAX_HASH_LEN];
        bytes[..len].copy_from_slice(&digest[..len]);
        Self {
            bytes,
            len: len as u8,
        }
    }

    /// The digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Digest width in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True for the default hash held before any block was read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Lowercase hexadecimal rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.as_bytes().iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl From<u32> for BlockHash {
    fn from(value: u32) -> Self {
        Self::from_bytes(&value.to_be_bytes())
    }
}

impl From<u64> for BlockHash {
    fn from(value: u64) -> Self {
        Self::from_bytes(&value.to_be_bytes())
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", self.to_hex())
    }
}

/// A file whose content can be hashed incrementally, block by block.
///
/// The cursor only moves forward. Once [`read_next_block`](File::read_next_block)
/// returns `Ok(false)` every later call must return `Ok(false)` as well.
pub trait File {
    /// Total size in bytes. Constant for the lifetime of the object.
    fn size(&self) -> u64;

    /// Read at most `block_size` bytes from the cursor and hash them.
    ///
    /// Returns `Ok(true)` when a block was read and [`block_hash`](File::block_hash)
    /// now reflects it, `Ok(false)` when no data remains (the current hash is
    /// left untouched).
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when the underlying resource cannot be read.
    fn read_next_block(
        &mut self,
        block_size: usize,
        hasher: &dyn BlockHasher,
    ) -> Result<bool, HashError>;

    /// Hash produced by the most recent successful read.
    fn block_hash(&self) -> &BlockHash;

    /// Stable label used for reporting only.
    fn identity(&self) -> &str;
}

impl<F: File + ?Sized> File for &mut F {
    fn size(&self) -> u64 {
        (**self).size()
    }

    fn read_next_block(
        &mut self,
        block_size: usize,
        hasher: &dyn BlockHasher,
    ) -> Result<bool, HashError> {
        (**self).read_next_block(block_size, hasher)
    }

    fn block_hash(&self) -> &BlockHash {
        (**self).block_hash()
    }

    fn identity(&self) -> &str {
        (**self).identity()
    }
}

impl<F: File + ?Sized> File for Box<F> {
    fn size(&self) -> u64 {
        (**self).size()
    }

    fn read_next_block(
        &mut self,
        block_size: usize,
        hasher: &dyn BlockHasher,
    ) -> Result<bool, HashError> {
        (**self).read_next_block(block_size, hasher)
    }

    fn block_hash(&self) -> &BlockHash {
        (**self).block_hash()
    }

    fn identity(&self) -> &str {
        (**self).identity()
    }
}

/// Errors that can occur while reading a block.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file disappeared after it was discovered.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Any other I/O error while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while reading `path`.
    #[must_use]
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source },
        }
    }
}
