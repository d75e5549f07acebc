//! The certificate ledger.
//!
//! This module provides the chain state and the operations on it:
//!
//! - the single-owner [`Ledger`] (committed blocks + pending batch),
//! - the chain-integrity check ([`integrity`]),
//! - a lock-guarded, cloneable handle for concurrent callers
//!   ([`SharedLedger`]),
//! - and the [`Clock`] used to timestamp new blocks.

pub mod clock;
pub mod integrity;
pub mod ledger;
pub mod shared;

pub use clock::{Clock, SystemClock};
pub use integrity::verify_chain;
pub use self::ledger::{ChainSnapshot, Ledger};
pub use shared::{IssueOutcome, SharedLedger, VerifyOutcome};
