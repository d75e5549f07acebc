// ledger/src/types/block.rs

//! Block type and canonical hashing.
//!
//! A [`Block`] seals an ordered batch of [`CertificateHash`]es and links to
//! its predecessor through `previous_hash`. Its own `hash` is computed once,
//! in [`Block::seal`], and never recomputed in place.
//!
//! Serialization for hashing is done with **bincode 2** using the `serde`
//! integration (`bincode::serde::encode_to_vec`) and an explicit
//! `standard()` config, prefixed with [`CANONICAL_DOMAIN_TAG`]. This byte
//! layout is the integrity anchor for every block ever sealed: treat it as
//! a frozen wire format and bump the tag if it ever has to change.

use serde::Serialize;

use super::{BlockHash, CertificateHash, Hash256};

/// Domain-separation prefix of the version 1 canonical block encoding.
pub const CANONICAL_DOMAIN_TAG: &[u8] = b"certledger.block.v1\0";

/// The exact field set that goes into a block hash, in hashing order.
#[derive(Serialize)]
struct CanonicalFields<'a> {
    index: u64,
    timestamp: u64,
    certificate_hashes: &'a [CertificateHash],
    previous_hash: &'a BlockHash,
}

/// A sealed, hash-linked batch of certificate hashes.
///
/// Fields are private: once sealed a block can only be read, so the
/// invariant "`hash` is the canonical hash of the other four fields at
/// creation time" cannot be broken from outside the crate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Block {
    /// 1-based position in the chain.
    index: u64,
    /// Creation time, in milliseconds since the Unix epoch.
    timestamp: u64,
    /// The batch sealed into this block, in submission order.
    certificate_hashes: Vec<CertificateHash>,
    /// Hash of the preceding block, or the genesis sentinel.
    previous_hash: BlockHash,
    /// Canonical hash of the four fields above.
    hash: BlockHash,
}

impl Block {
    /// Builds a block from its fields and computes its hash.
    pub fn seal(
        index: u64,
        timestamp: u64,
        certificate_hashes: Vec<CertificateHash>,
        previous_hash: BlockHash,
    ) -> Self {
        let hash = hash_fields(index, timestamp, &certificate_hashes, &previous_hash);
        Self {
            index,
            timestamp,
            certificate_hashes,
            previous_hash,
            hash,
        }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn certificate_hashes(&self) -> &[CertificateHash] {
        &self.certificate_hashes
    }

    pub fn previous_hash(&self) -> BlockHash {
        self.previous_hash
    }

    /// The hash stored at sealing time.
    pub fn hash(&self) -> BlockHash {
        self.hash
    }

    /// Returns `true` if `certificate` was sealed into this block.
    pub fn contains(&self, certificate: &CertificateHash) -> bool {
        self.certificate_hashes.contains(certificate)
    }

    /// Returns the canonical byte representation of this block's hashed
    /// fields (`index`, `timestamp`, `certificate_hashes`, `previous_hash`).
    ///
    /// The stored `hash` is never part of the encoding.
    ///
    /// # Panics
    ///
    /// Panics if encoding fails. This is considered a programming
    /// error, because all fields are plain integers and strings.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        canonical_bytes(
            self.index,
            self.timestamp,
            &self.certificate_hashes,
            &self.previous_hash,
        )
    }

    /// Recomputes the canonical hash from the block's current fields.
    ///
    /// For an untampered block this equals [`Block::hash`].
    pub fn compute_hash(&self) -> BlockHash {
        hash_fields(
            self.index,
            self.timestamp,
            &self.certificate_hashes,
            &self.previous_hash,
        )
    }

    /// Mutable access to the sealed batch, bypassing the seal. Only used to
    /// simulate tampering in tests.
    #[cfg(any(test, feature = "test-util"))]
    pub fn certificate_hashes_mut(&mut self) -> &mut Vec<CertificateHash> {
        &mut self.certificate_hashes
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }
}

fn canonical_bytes(
    index: u64,
    timestamp: u64,
    certificate_hashes: &[CertificateHash],
    previous_hash: &BlockHash,
) -> Vec<u8> {
    let fields = CanonicalFields {
        index,
        timestamp,
        certificate_hashes,
        previous_hash,
    };
    // Explicit config to avoid relying on any implicit defaults.
    let cfg = bincode::config::standard();
    bincode::serde::encode_to_vec(&fields, cfg)
        .expect("block fields should always be serializable with bincode 2 + serde")
}

fn hash_fields(
    index: u64,
    timestamp: u64,
    certificate_hashes: &[CertificateHash],
    previous_hash: &BlockHash,
) -> BlockHash {
    let bytes = canonical_bytes(index, timestamp, certificate_hashes, previous_hash);
    BlockHash(Hash256::compute_parts(&[CANONICAL_DOMAIN_TAG, bytes.as_slice()]))
}
