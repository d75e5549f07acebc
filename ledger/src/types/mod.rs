//! Core domain types used by the ledger.
//!
//! This module defines strongly-typed 256-bit digests for certificates and
//! blocks. The goal is to avoid "naked" byte buffers or hex strings in
//! public APIs and instead use domain-specific newtypes whose equality is
//! byte-for-byte.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::ParseHashError;

/// Block types and the canonical block encoding.
pub mod block;

pub use block::{Block, CANONICAL_DOMAIN_TAG};

/// Length in bytes of all 256-bit hash types used in this module.
pub const HASH_LEN: usize = 32;

/// Strongly-typed 256-bit hash wrapper (SHA-256).
///
/// This type backs every fixed-size digest in the ledger. It serializes as
/// a 64-character lowercase hex string, which is also its [`Display`]
/// form, so JSON responses and the canonical block encoding agree on a
/// single textual representation.
#[derive(Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Hash256(pub [u8; HASH_LEN]);

impl Hash256 {
    /// The all-zero digest.
    pub const ZERO: Hash256 = Hash256([0u8; HASH_LEN]);

    /// Computes a new [`Hash256`] as the SHA-256 hash of `data`.
    pub fn compute(data: &[u8]) -> Self {
        Self::compute_parts(&[data])
    }

    /// Computes the SHA-256 hash of the concatenation of `parts`.
    pub fn compute_parts(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        Hash256(hasher.finalize().into())
    }

    /// Returns the underlying 32-byte hash as a borrowed array.
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Lowercase hex encoding (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

impl FromStr for Hash256 {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != HASH_LEN * 2 {
            return Err(ParseHashError::Length(s.len()));
        }
        let bytes = hex::decode(s).map_err(|_| ParseHashError::InvalidHex)?;
        let mut arr = [0u8; HASH_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Hash256(arr))
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Content address of a normalised certificate text.
///
/// Two certificates whose normalised text is identical map to the same
/// `CertificateHash`; the ledger uses this as its deduplication and
/// lookup key.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateHash(pub Hash256);

impl CertificateHash {
    /// Hashes already-normalised certificate text.
    ///
    /// Callers holding raw text should go through
    /// [`crate::certificate::hash_certificate`] instead, which normalises
    /// first.
    pub fn from_normalized(text: &str) -> Self {
        CertificateHash(Hash256::compute(text.as_bytes()))
    }

    /// Returns the underlying [`Hash256`].
    pub fn as_hash(&self) -> &Hash256 {
        &self.0
    }
}

impl fmt::Display for CertificateHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for CertificateHash {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(CertificateHash)
    }
}

/// Strongly-typed block hash.
///
/// This is the digest of a [`Block`]'s canonical fields, see
/// [`Block::canonical_bytes`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockHash(pub Hash256);

impl BlockHash {
    /// Returns the underlying [`Hash256`].
    pub fn as_hash(&self) -> &Hash256 {
        &self.0
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// `previous_hash` of the genesis block.
pub const GENESIS_PARENT: BlockHash = BlockHash(Hash256::ZERO);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_known_input() {
        // printf 'abc' | sha256sum
        let h = Hash256::compute(b"abc");
        assert_eq!(
            h.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn compute_parts_matches_concatenation() {
        let joined = Hash256::compute(b"hello world");
        let parts =
            Hash256::compute_parts(&[b"hello".as_slice(), b" ".as_slice(), b"world".as_slice()]);
        assert_eq!(joined, parts);
    }

    #[test]
    fn hex_parse_rejects_bad_input() {
        assert_eq!(
            "abcd".parse::<Hash256>().unwrap_err(),
            ParseHashError::Length(4)
        );

        let not_hex = "z".repeat(64);
        assert_eq!(
            not_hex.parse::<Hash256>().unwrap_err(),
            ParseHashError::InvalidHex
        );
    }

    #[test]
    fn certificate_hash_serializes_as_hex_string() {
        let h = CertificateHash::from_normalized("Hello World");
        let json = serde_json::to_string(&h).expect("serialize");
        assert_eq!(json, format!("\"{}\"", h));

        let back: CertificateHash = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, h);
    }

    #[test]
    fn genesis_parent_is_all_zero() {
        assert_eq!(GENESIS_PARENT.as_hash().as_bytes(), &[0u8; HASH_LEN]);
        assert_eq!(GENESIS_PARENT.to_string(), "0".repeat(64));
    }
}
