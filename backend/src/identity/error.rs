//! Identity verification error types

use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use thiserror::Error;

/// Reasons a bearer credential was rejected
///
/// Callers only ever surface "invalid credential"; the variants exist for diagnostics.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Token signature does not match the configured secret
    #[error("Token signature is invalid")]
    InvalidSignature,

    /// Token `exp` claim is in the past
    #[error("Token has expired")]
    Expired,

    /// Token could not be decoded or uses another algorithm
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// None of `id`, `user_id` or `sub` carries a usable value
    #[error("Token carries no subject claim")]
    MissingSubject,
}

impl From<JwtError> for IdentityError {
    fn from(error: JwtError) -> Self {
        match error.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed(error.to_string()),
        }
    }
}
