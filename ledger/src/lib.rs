//! Ledger library crate.
//!
//! This crate provides the core of a tamper-evident certificate ledger:
//!
//! - strongly-typed digests and the sealed [`Block`] type (`types`),
//! - certificate normalisation and content addressing (`certificate`),
//! - the chain state, integrity check and shared handle (`chain`),
//! - Prometheus-based metrics (`metrics`),
//! - and service configuration (`config`).
//!
//! Certificates are normalised and hashed, deduplicated against every
//! committed block and the pending batch, and sealed into hash-linked
//! blocks. The chain lives in process memory only.

pub mod certificate;
pub mod chain;
pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

// Re-export top-level configuration types.
pub use config::{LedgerConfig, MetricsConfig};

// Re-export the ledger and its outcomes.
pub use chain::{
    ChainSnapshot, Clock, IssueOutcome, Ledger, SharedLedger, SystemClock, VerifyOutcome,
    verify_chain,
};

pub use certificate::{hash_certificate, hash_certificate_field, normalize};
pub use error::{CertificateError, ConfigError, IntegrityError, ParseHashError};

// Re-export metrics registry and ledger metrics.
pub use metrics::{LedgerMetrics, MetricsRegistry, run_prometheus_http_server};

// Re-export domain types at the crate root for convenience.
pub use types::*;
