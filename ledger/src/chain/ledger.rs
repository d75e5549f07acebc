//! Single-owner ledger state.
//!
//! [`Ledger`] owns the committed chain and the pending batch. It is not
//! synchronised; concurrent callers go through
//! [`SharedLedger`](super::SharedLedger), which serialises every operation
//! behind one lock.

use serde::Serialize;

use crate::error::IntegrityError;
use crate::types::{Block, BlockHash, CertificateHash, GENESIS_PARENT};

use super::clock::{Clock, SystemClock};
use super::integrity::verify_chain;

/// Owned copy of the full ledger state, as returned by a chain listing.
#[derive(Clone, Debug, Serialize)]
pub struct ChainSnapshot {
    pub length: usize,
    pub is_valid: bool,
    pub chain: Vec<Block>,
    pub pending_certificates: Vec<CertificateHash>,
}

/// Append-only chain of blocks plus the batch waiting to be mined.
///
/// Invariants:
///
/// - `chain` is never empty; `chain[0]` is the genesis block whose
///   `previous_hash` is [`GENESIS_PARENT`],
/// - `chain[i].index == i + 1` and `chain[i].previous_hash == chain[i-1].hash`,
/// - a certificate hash appears at most once across all committed blocks
///   and the pending batch.
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<CertificateHash>,
    clock: Box<dyn Clock>,
}

impl Ledger {
    /// Creates a ledger holding only the genesis block, timestamped by the
    /// wall clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Creates a ledger holding only the genesis block, timestamped by
    /// `clock`.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pending: Vec::new(),
            clock: Box::new(clock),
        };
        ledger.create_block(Vec::new(), GENESIS_PARENT);
        ledger
    }

    /// Seals `hashes` into a new block on top of the chain and appends it.
    ///
    /// The caller supplies `previous_hash`; everything but the genesis
    /// bootstrap should pass the current tip's hash, which is what
    /// [`Ledger::mine_pending_certificates`] does. The timestamp is never
    /// earlier than the previous block's, even if the clock steps back.
    pub fn create_block(
        &mut self,
        hashes: Vec<CertificateHash>,
        previous_hash: BlockHash,
    ) -> &Block {
        let index = self.chain.len() as u64 + 1;
        let now = self.clock.now_millis();
        let timestamp = self
            .chain
            .last()
            .map_or(now, |last| now.max(last.timestamp()));

        self.chain
            .push(Block::seal(index, timestamp, hashes, previous_hash));
        &self.chain[self.chain.len() - 1]
    }

    /// Queues `hash` for the next block unless it is already known.
    ///
    /// Returns `false`, without touching any state, when `hash` is already
    /// committed or pending.
    pub fn add_certificate(&mut self, hash: CertificateHash) -> bool {
        if self.certificate_exists(&hash) {
            tracing::debug!(certificate = %hash, "duplicate certificate rejected");
            return false;
        }
        self.pending.push(hash);
        true
    }

    /// Seals the whole pending batch into a new block.
    ///
    /// Returns `None` if nothing is pending. Afterwards the pending batch
    /// is empty and the returned block holds exactly what was pending, in
    /// the same order.
    pub fn mine_pending_certificates(&mut self) -> Option<&Block> {
        if self.pending.is_empty() {
            return None;
        }

        let previous_hash = self.last_block().hash();
        // The batch moves into the block; `pending` is left empty.
        let batch = std::mem::take(&mut self.pending);
        let block = self.create_block(batch, previous_hash);

        tracing::info!(
            index = block.index(),
            hash = %block.hash(),
            certificates = block.certificate_hashes().len(),
            "mined block"
        );
        Some(block)
    }

    /// Returns `true` if `hash` is in any committed block or pending.
    ///
    /// Committed blocks are scanned oldest first.
    pub fn certificate_exists(&self, hash: &CertificateHash) -> bool {
        self.chain.iter().any(|block| block.contains(hash)) || self.pending.contains(hash)
    }

    /// Index of the committed block holding `hash`, if any.
    pub fn find_block_for(&self, hash: &CertificateHash) -> Option<u64> {
        self.chain
            .iter()
            .find(|block| block.contains(hash))
            .map(Block::index)
    }

    /// `true` if every adjacent block pair passes linkage and
    /// self-consistency checks.
    pub fn is_valid(&self) -> bool {
        self.verify_integrity().is_ok()
    }

    /// Like [`Ledger::is_valid`], but reports the first failing block.
    pub fn verify_integrity(&self) -> Result<(), IntegrityError> {
        verify_chain(&self.chain)
    }

    /// Number of committed blocks, genesis included. Never zero.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Always `false`: a ledger holds at least its genesis block.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[CertificateHash] {
        &self.pending
    }

    /// The tip of the chain.
    pub fn last_block(&self) -> &Block {
        // The genesis block is created in the constructor and blocks are
        // never removed.
        &self.chain[self.chain.len() - 1]
    }

    /// Owned copy of the whole state, including a fresh validity verdict.
    pub fn snapshot(&self) -> ChainSnapshot {
        ChainSnapshot {
            length: self.chain.len(),
            is_valid: self.is_valid(),
            chain: self.chain.clone(),
            pending_certificates: self.pending.clone(),
        }
    }

    /// Mutable access to committed blocks. Only used to simulate tampering
    /// in tests.
    #[cfg(any(test, feature = "test-util"))]
    pub fn chain_mut(&mut self) -> &mut Vec<Block> {
        &mut self.chain
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
