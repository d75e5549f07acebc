//! Error types for the ledger crate.

use thiserror::Error;

/// Rejection of a certificate before it reaches the ledger.
///
/// Both variants are client errors: they are reported back to the caller
/// and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CertificateError {
    /// The certificate field is missing or not textual.
    #[error("Certificate must be a string")]
    InvalidInput,
    /// The certificate text normalises to the empty string.
    #[error("Certificate cannot be empty")]
    EmptyCertificate,
}

/// A broken chain, as found by the integrity check.
///
/// `index` is the 1-based index of the first block that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    /// `previous_hash` does not match the preceding block's hash.
    #[error("block {index}: previous_hash does not match the preceding block")]
    BrokenLink { index: u64 },
    /// The stored hash does not match the recomputed canonical hash.
    #[error("block {index}: stored hash does not match its contents")]
    HashMismatch { index: u64 },
}

impl IntegrityError {
    /// 1-based index of the offending block.
    pub fn index(&self) -> u64 {
        match self {
            IntegrityError::BrokenLink { index } | IntegrityError::HashMismatch { index } => *index,
        }
    }
}

/// Failure to parse a hex-encoded 256-bit digest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseHashError {
    #[error("expected 64 hex characters, got {0}")]
    Length(usize),
    #[error("invalid hex encoding")]
    InvalidHex,
}

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}
