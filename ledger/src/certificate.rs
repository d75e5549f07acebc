//! Certificate normalisation and content addressing.
//!
//! Certificate text is canonicalised before hashing so that submissions
//! differing only in whitespace map to the same [`CertificateHash`]:
//! leading and trailing whitespace is dropped and every internal run of
//! whitespace becomes a single space. The hash is SHA-256 over the UTF-8
//! bytes of the normalised text.
//!
//! Whitespace is Unicode `White_Space` plus the ASCII information
//! separators U+001C..=U+001F, which the service has always treated as
//! whitespace.
//!
//! Both functions are pure; identical normalised text always yields an
//! identical digest.

use crate::error::CertificateError;
use crate::types::CertificateHash;

/// Returns the canonical form of `input`.
///
/// Fails with [`CertificateError::EmptyCertificate`] if nothing but
/// whitespace remains.
pub fn normalize(input: &str) -> Result<String, CertificateError> {
    let normalized = input
        .split(is_separator)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if normalized.is_empty() {
        return Err(CertificateError::EmptyCertificate);
    }
    Ok(normalized)
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Normalises `input` and returns its content address.
pub fn hash_certificate(input: &str) -> Result<CertificateHash, CertificateError> {
    let normalized = normalize(input)?;
    Ok(CertificateHash::from_normalized(&normalized))
}

/// Like [`hash_certificate`], for a field that may be absent.
///
/// `None` maps to [`CertificateError::InvalidInput`].
pub fn hash_certificate_field(input: Option<&str>) -> Result<CertificateHash, CertificateError> {
    hash_certificate(input.ok_or(CertificateError::InvalidInput)?)
}
