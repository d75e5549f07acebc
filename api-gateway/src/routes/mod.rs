//! HTTP handlers.
//!
//! Request bodies have an explicit schema ([`CertificateRequest`]); any
//! body that does not match it (missing, not JSON, missing or non-string
//! `certificate`) is rejected as invalid input before it reaches the
//! ledger.

pub mod certificates;
pub mod chain;
pub mod health;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use ledger::{CertificateError, CertificateHash, hash_certificate_field};

/// Request body for `POST /issue` and `POST /verify`.
#[derive(Debug, Deserialize)]
pub struct CertificateRequest {
    /// Raw certificate text; normalised before hashing.
    pub certificate: String,
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A request rejected before touching the ledger.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl From<CertificateError> for ApiError {
    fn from(e: CertificateError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Validates the request body and hashes its certificate text.
fn certificate_hash(
    payload: Result<Json<CertificateRequest>, JsonRejection>,
) -> Result<CertificateHash, ApiError> {
    let text = match &payload {
        Ok(Json(body)) => Some(body.certificate.as_str()),
        Err(rejection) => {
            tracing::debug!("rejected certificate request body: {rejection}");
            None
        }
    };
    Ok(hash_certificate_field(text)?)
}
