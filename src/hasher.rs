//! Block hash functions.
//!
//! # Overview
//!
//! [`BlockHasher`] is the only way content turns into comparable keys. The
//! engine treats equal hashes as equal content, so the algorithm should be
//! strong enough that collisions are not a practical concern for the
//! collection being compared.
//!
//! [`HashAlgorithm`] provides the concrete algorithms selectable from the
//! command line and config file. Any `Fn(&[u8]) -> BlockHash` also works as a
//! hasher, which is convenient for tests.

use clap::ValueEnum;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::file::BlockHash;

/// A deterministic function from a block of bytes to a [`BlockHash`].
pub trait BlockHasher {
    /// Hash one block. Must return the same value for the same bytes.
    fn hash_block(&self, block: &[u8]) -> BlockHash;
}

impl<F> BlockHasher for F
where
    F: Fn(&[u8]) -> BlockHash,
{
    fn hash_block(&self, block: &[u8]) -> BlockHash {
        self(block)
    }
}

/// Hash algorithms available for block comparison.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// BLAKE3, 256-bit
    #[default]
    Blake3,
    /// SHA-256
    Sha256,
    /// MD5, 128-bit
    Md5,
    /// CRC32 (IEEE), 32-bit
    Crc32,
    /// XXH3, 64-bit
    Xxh3,
}

impl HashAlgorithm {
    /// Width of the produced digest in bytes.
    #[must_use]
    pub fn digest_len(self) -> usize {
        match self {
            Self::Blake3 | Self::Sha256 => 32,
            Self::Md5 => 16,
            Self::Crc32 => 4,
            Self::Xxh3 => 8,
        }
    }

    /// Whether the algorithm is collision resistant.
    ///
    /// CRC32 and XXH3 are fast checksums: fine for a quick look, but
    /// collisions between different blocks are possible in large trees.
    #[must_use]
    pub fn is_cryptographic(self) -> bool {
        matches!(self, Self::Blake3 | Self::Sha256 | Self::Md5)
    }
}

impl BlockHasher for HashAlgorithm {
    fn hash_block(&self, block: &[u8]) -> BlockHash {
        match self {
            Self::Blake3 => BlockHash::from_bytes(blake3::hash(block).as_bytes()),
            Self::Sha256 => BlockHash::from_bytes(&Sha256::digest(block)),
            Self::Md5 => BlockHash::from_bytes(&Md5::digest(block)),
            Self::Crc32 => BlockHash::from(crc32fast::hash(block)),
            Self::Xxh3 => BlockHash::from(xxhash_rust::xxh3::xxh3_64(block)),
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blake3 => write!(f, "blake3"),
            Self::Sha256 => write!(f, "sha256"),
            Self::Md5 => write!(f, "md5"),
            Self::Crc32 => write!(f, "crc32"),
            Self::Xxh3 => write!(f, "xxh3"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [HashAlgorithm; 5] = [
        HashAlgorithm::Blake3,
        HashAlgorithm::Sha256,
        HashAlgorithm::Md5,
        HashAlgorithm::Crc32,
        HashAlgorithm::Xxh3,
    ];

    #[test]
    fn test_digest_len_matches_output() {
        for alg in ALL {
            let hash = alg.hash_block(b"some block");
            assert_eq!(hash.len(), alg.digest_len(), "{alg}");
        }
    }

    #[test]
    fn test_deterministic() {
        for alg in ALL {
            assert_eq!(alg.hash_block(b"abc"), alg.hash_block(b"abc"), "{alg}");
            assert_ne!(alg.hash_block(b"abc"), alg.hash_block(b"abd"), "{alg}");
        }
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            HashAlgorithm::Md5.hash_block(b"").to_hex(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            HashAlgorithm::Sha256.hash_block(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(HashAlgorithm::Crc32.hash_block(b"123456789").to_hex(), "cbf43926");
    }

    #[test]
    fn test_closure_hasher() {
        let first_byte = |block: &[u8]| BlockHash::from_bytes(&block[..1]);
        assert_eq!(first_byte.hash_block(b"xyz"), BlockHash::from_bytes(b"x"));
    }

    #[test]
    fn test_cryptographic_flag() {
        assert!(HashAlgorithm::Blake3.is_cryptographic());
        assert!(!HashAlgorithm::Crc32.is_cryptographic());
        assert!(!HashAlgorithm::Xxh3.is_cryptographic());
    }

    #[test]
    fn test_display_matches_value_enum() {
        for alg in ALL {
            let parsed = HashAlgorithm::from_str(&alg.to_string(), true).unwrap();
            assert_eq!(parsed, alg);
        }
    }
}
