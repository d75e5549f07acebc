//! Shared application state.

use std::sync::Arc;

use ledger::SharedLedger;

/// Shared state held by the API handlers.
///
/// This is wrapped in an [`Arc`] and passed to request handlers via Axum's
/// `State` extractor. The ledger handle serialises all access internally,
/// so handlers never hold a lock across an `.await`.
pub struct AppState {
    /// The process-wide certificate ledger.
    pub ledger: SharedLedger,
}

impl AppState {
    pub fn new(ledger: SharedLedger) -> SharedState {
        Arc::new(Self { ledger })
    }
}

/// Thread-safe alias for `AppState`.
pub type SharedState = Arc<AppState>;
