use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;

use crate::{identity::Identity, state::AppState, types::AppError};

/// Authenticated caller extracted from the `Authorization` header
///
/// Use this in handlers of authenticated routes; it runs before any body extractor,
/// so credentials are checked before a payload is read:
/// ```ignore
/// async fn protected_handler(
///     user: AuthenticatedUser,
///     // ... other extractors
/// ) -> Result<impl IntoResponse, AppError> {
///     Ok(user.identity.id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Verified caller identity
    pub identity: Identity,
}

impl AuthenticatedUser {
    /// Id of the caller, also their storage prefix
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.identity.id
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .filter(|value| !value.as_bytes().iter().all(u8::is_ascii_whitespace))
            .ok_or_else(|| AppError::unauthorized("Authorization header missing"))?;

        let invalid = || AppError::unauthorized("Invalid or expired token");

        let credential = header.to_str().map_err(|_| invalid())?;

        let identity = state
            .identity_verifier
            .verify(credential)
            .map_err(|err| {
                debug!("Rejected credential: {err}");
                invalid()
            })?;

        Ok(Self { identity })
    }
}
