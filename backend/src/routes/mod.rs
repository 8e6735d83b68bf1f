pub mod health;
pub mod images;
pub mod user_images;

use axum::{
    http::{Method, Uri},
    routing::get,
    Router,
};

use crate::{state::AppState, types::AppError};

/// Creates the router with all handler routes
///
/// | Path             | Methods            | Guard            |
/// |------------------|--------------------|------------------|
/// | `/images/status` | GET                | none             |
/// | `/images`        | GET                | region allow-list|
/// | `/images/user`   | GET, PUT, DELETE   | bearer token     |
///
/// Other methods on these paths answer 405, other paths 404. `get` would also
/// answer HEAD, so HEAD is routed to the 405 handler explicitly.
pub fn handler() -> Router<AppState> {
    Router::new()
        .route(
            "/images/status",
            get(health::handler)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route(
            "/images",
            get(images::list_all_images)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route(
            "/images/user",
            get(user_images::list_user_images)
                .head(method_not_allowed)
                .put(user_images::upload_image)
                .delete(user_images::delete_image)
                .fallback(method_not_allowed),
        )
        .fallback(route_not_found)
}

#[allow(clippy::unused_async)]
async fn method_not_allowed() -> AppError {
    AppError::method_not_allowed()
}

#[allow(clippy::unused_async)]
async fn route_not_found(method: Method, uri: Uri) -> AppError {
    tracing::warn!("No route found for {method} {}", uri.path());
    AppError::not_found("Route not found")
}
