//! Uniform JSON response envelope

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Content type of every response body
const APPLICATION_JSON: &str = "application/json";

/// Fallback body when a payload cannot be serialized
const SERIALIZATION_FAILURE_BODY: &str = r#"{"error":"Internal server error"}"#;

/// A JSON body paired with its status code
///
/// Every handler outcome, error paths included, is rendered through this type so
/// that bodies are always a serialized flat object with `Content-Type: application/json`.
/// CORS headers are attached to every response by
/// [`crate::middleware::cors::apply_cors_headers`].
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    body: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a response with an explicit status code
    pub const fn new(status: StatusCode, body: T) -> Self {
        Self { status, body }
    }

    /// Creates a `200 OK` response
    pub const fn ok(body: T) -> Self {
        Self::new(StatusCode::OK, body)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let (status, bytes) = match serde_json::to_vec(&self.body) {
            Ok(bytes) => (self.status, bytes),
            Err(err) => {
                tracing::error!("Failed to serialize response body: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SERIALIZATION_FAILURE_BODY.as_bytes().to_vec(),
                )
            }
        };

        let mut response = (status, bytes).into_response();
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_JSON),
        );
        response
    }
}
