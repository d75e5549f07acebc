use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use serde::Serialize;

use ledger::{IssueOutcome, VerifyOutcome};

use super::{ApiError, CertificateRequest, certificate_hash};
use crate::state::SharedState;

/// Response body for `POST /issue`.
///
/// Serialised without a tag; the two shapes differ only in whether
/// `block_index` is present.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum IssueResponse {
    Issued {
        message: &'static str,
        certificate_hash: String,
        block_index: Option<u64>,
    },
    AlreadyExists {
        message: &'static str,
        certificate_hash: String,
    },
}

/// Response body for `POST /verify`.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub explanation: &'static str,
}

pub const ISSUED: &str = "Certificate issued and stored on blockchain";
pub const ALREADY_EXISTS: &str = "Certificate already exists";
pub const FOUND: &str = "This certificate exists on the blockchain and has not been altered.";
pub const NOT_FOUND: &str = "Certificate not found. It may be fake or altered.";
pub const TAMPERED: &str = "Blockchain integrity check failed. Data may have been tampered with.";

/// `POST /issue`
///
/// Hashes the certificate and, unless it is already known, seals it into a
/// new block right away.
pub async fn issue_certificate(
    State(state): State<SharedState>,
    payload: Result<Json<CertificateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IssueResponse>), ApiError> {
    let hash = certificate_hash(payload)?;

    let response = match state.ledger.issue(hash) {
        IssueOutcome::Issued {
            certificate_hash,
            block_index,
        } => {
            tracing::info!(certificate = %certificate_hash, ?block_index, "certificate issued");
            (
                StatusCode::CREATED,
                Json(IssueResponse::Issued {
                    message: ISSUED,
                    certificate_hash: certificate_hash.to_string(),
                    block_index,
                }),
            )
        }
        IssueOutcome::AlreadyExists { certificate_hash } => (
            StatusCode::OK,
            Json(IssueResponse::AlreadyExists {
                message: ALREADY_EXISTS,
                certificate_hash: certificate_hash.to_string(),
            }),
        ),
    };
    Ok(response)
}

/// `POST /verify`
///
/// Reports whether the certificate is held by an intact chain. A broken
/// chain is a server error, distinct from "not found".
pub async fn verify_certificate(
    State(state): State<SharedState>,
    payload: Result<Json<CertificateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VerifyResponse>), ApiError> {
    let hash = certificate_hash(payload)?;

    let (status, valid, explanation) = match state.ledger.verify(&hash) {
        VerifyOutcome::Found => (StatusCode::OK, true, FOUND),
        VerifyOutcome::NotFound => (StatusCode::OK, false, NOT_FOUND),
        VerifyOutcome::IntegrityFailure(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, false, TAMPERED)
        }
    };
    Ok((status, Json(VerifyResponse { valid, explanation })))
}
