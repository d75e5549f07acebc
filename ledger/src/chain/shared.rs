//! Shared, lock-guarded ledger handle.
//!
//! The serving layer handles requests concurrently against one ledger.
//! [`SharedLedger`] wraps the [`Ledger`] in a single mutex and takes it
//! once per operation, so every check-then-act sequence (dedup + append,
//! drain + seal, integrity check + lookup) runs without interleaving.
//! Nothing handed out by this type borrows the guarded state: blocks and
//! snapshots are owned copies.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::error::IntegrityError;
use crate::metrics::LedgerMetrics;
use crate::types::{Block, CertificateHash};

use super::ledger::{ChainSnapshot, Ledger};

/// Result of issuing a certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IssueOutcome {
    /// The hash was new and has been sealed.
    ///
    /// `block_index` is the block that now holds it.
    Issued {
        certificate_hash: CertificateHash,
        block_index: Option<u64>,
    },
    /// The hash was already committed or pending; nothing changed.
    AlreadyExists { certificate_hash: CertificateHash },
}

/// Result of verifying a certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The chain is intact and holds the certificate (committed or pending).
    Found,
    /// The chain is intact but does not hold the certificate.
    NotFound,
    /// The chain itself failed the integrity check; presence was not
    /// evaluated.
    IntegrityFailure(IntegrityError),
}

/// Cloneable handle to a process-wide [`Ledger`].
#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
    metrics: Option<LedgerMetrics>,
}

impl SharedLedger {
    /// Wraps a fresh ledger (genesis only, wall-clock timestamps).
    pub fn new() -> Self {
        Self::from_ledger(Ledger::new())
    }

    pub fn from_ledger(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
            metrics: None,
        }
    }

    /// Attaches metrics; every later operation through this handle (and its
    /// clones) updates them.
    pub fn with_metrics(self, metrics: LedgerMetrics) -> Self {
        {
            let guard = self.inner.lock();
            metrics.observe_sizes(guard.len(), guard.pending().len());
        }
        Self {
            metrics: Some(metrics),
            ..self
        }
    }

    /// See [`Ledger::add_certificate`].
    pub fn add_certificate(&self, hash: CertificateHash) -> bool {
        let mut guard = self.inner.lock();
        let added = guard.add_certificate(hash);
        self.record_add(&guard, added);
        added
    }

    /// See [`Ledger::mine_pending_certificates`]. Returns an owned copy of
    /// the new block.
    pub fn mine_pending_certificates(&self) -> Option<Block> {
        let mut guard = self.inner.lock();
        let block = guard.mine_pending_certificates().cloned();
        self.record_mine(&guard, block.is_some());
        block
    }

    /// Adds `hash` and, if it was new, seals the pending batch, all under
    /// one lock acquisition.
    pub fn issue(&self, hash: CertificateHash) -> IssueOutcome {
        let mut guard = self.inner.lock();

        let added = guard.add_certificate(hash);
        self.record_add(&guard, added);
        if !added {
            return IssueOutcome::AlreadyExists {
                certificate_hash: hash,
            };
        }

        let block_index = guard.mine_pending_certificates().map(Block::index);
        self.record_mine(&guard, block_index.is_some());

        IssueOutcome::Issued {
            certificate_hash: hash,
            block_index,
        }
    }

    /// Checks chain integrity, then looks `hash` up, under one lock
    /// acquisition.
    pub fn verify(&self, hash: &CertificateHash) -> VerifyOutcome {
        let guard = self.inner.lock();

        if let Err(e) = self.timed_integrity_check(&guard) {
            return VerifyOutcome::IntegrityFailure(e);
        }
        if guard.certificate_exists(hash) {
            VerifyOutcome::Found
        } else {
            VerifyOutcome::NotFound
        }
    }

    pub fn certificate_exists(&self, hash: &CertificateHash) -> bool {
        self.inner.lock().certificate_exists(hash)
    }

    pub fn is_valid(&self) -> bool {
        self.verify_integrity().is_ok()
    }

    pub fn verify_integrity(&self) -> Result<(), IntegrityError> {
        let guard = self.inner.lock();
        self.timed_integrity_check(&guard)
    }

    /// Consistent owned copy of the whole ledger state.
    pub fn snapshot(&self) -> ChainSnapshot {
        let guard = self.inner.lock();
        let snapshot = guard.snapshot();
        if !snapshot.is_valid {
            self.record_integrity_failure();
        }
        snapshot
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Runs `f` with exclusive access to the underlying ledger. Only used
    /// to simulate tampering in tests.
    ///
    /// The lock is held for the duration of `f`; do not call back into
    /// this handle from inside it.
    #[cfg(any(test, feature = "test-util"))]
    pub fn with_ledger<R>(&self, f: impl FnOnce(&mut Ledger) -> R) -> R {
        let mut guard = self.inner.lock();
        let result = f(&mut *guard);
        if let Some(m) = &self.metrics {
            m.observe_sizes(guard.len(), guard.pending().len());
        }
        result
    }

    fn timed_integrity_check(&self, ledger: &Ledger) -> Result<(), IntegrityError> {
        let start = Instant::now();
        let result = ledger.verify_integrity();
        if let Some(m) = &self.metrics {
            m.integrity_check_seconds
                .observe(start.elapsed().as_secs_f64());
        }
        if let Err(e) = &result {
            tracing::error!(index = e.index(), "chain integrity check failed: {e}");
            self.record_integrity_failure();
        }
        result
    }

    fn record_add(&self, ledger: &Ledger, added: bool) {
        let Some(m) = &self.metrics else { return };
        if added {
            m.certificates_added.inc();
        } else {
            m.duplicate_certificates.inc();
        }
        m.observe_sizes(ledger.len(), ledger.pending().len());
    }

    fn record_mine(&self, ledger: &Ledger, mined: bool) {
        let Some(m) = &self.metrics else { return };
        if mined {
            m.blocks_mined.inc();
        }
        m.observe_sizes(ledger.len(), ledger.pending().len());
    }

    fn record_integrity_failure(&self) {
        if let Some(m) = &self.metrics {
            m.integrity_failures.inc();
        }
    }
}

impl Default for SharedLedger {
    fn default() -> Self {
        Self::new()
    }
}
