use serde::Serialize;

use crate::types::ApiResponse;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    message: &'static str,
    /// Current version of the application
    version: &'static str,
}

/// Health check endpoint
///
/// Answers regardless of credentials or region.
#[allow(clippy::unused_async)]
pub async fn handler() -> ApiResponse<HealthResponse> {
    tracing::info!("Handling health check request");
    ApiResponse::ok(HealthResponse {
        status: "OK",
        message: "Service is operational",
        version: env!("CARGO_PKG_VERSION"),
    })
}
