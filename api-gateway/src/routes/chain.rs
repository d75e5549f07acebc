use axum::{Json, extract::State};

use ledger::ChainSnapshot;

use crate::state::SharedState;

/// `GET /chain`
///
/// Returns the chain length, its current validity, every block, and the
/// pending batch, all taken from one consistent snapshot.
pub async fn full_chain(State(state): State<SharedState>) -> Json<ChainSnapshot> {
    Json(state.ledger.snapshot())
}
