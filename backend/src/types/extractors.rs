//! Custom extractors for request validation

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::types::error::AppError;

/// JSON body extractor that validates the payload
///
/// Unlike `axum::Json` it does not insist on a `Content-Type` header, since API
/// clients routinely send JSON bodies as plain text.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|err| {
            tracing::warn!("Failed to read request body: {err}");
            AppError::bad_request("Invalid request body")
        })?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::bad_request("Request body is required"));
        }

        let payload: T = serde_json::from_slice(&body).map_err(|err| {
            tracing::warn!("Invalid JSON payload: {err}");
            AppError::bad_request("Invalid request body")
        })?;

        // Then validate
        payload.validate().map_err(|errors| {
            // Use the first field error that carries a message
            errors
                .field_errors()
                .into_values()
                .filter_map(|field_errors| field_errors.first())
                .find_map(|error| error.message.clone())
                .map_or_else(
                    || AppError::bad_request("Request validation failed"),
                    AppError::bad_request,
                )
        })?;

        Ok(Self(payload))
    }
}
