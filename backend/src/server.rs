use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{middleware::apply_cors_headers, routes, state::AppState, types::AppError};

/// Room for JSON framing around a base64 payload
const BODY_LIMIT_SLACK: usize = 64 * 1024;

/// Builds the application router with all layers applied
///
/// Layers, from the outside in: request tracing, CORS headers, panic recovery and
/// the body size limit. CORS wraps panic recovery so a crashed handler still answers
/// with the CORS headers set.
pub fn app(state: AppState) -> Router {
    with_layers(routes::handler(), state)
}

fn with_layers(router: Router<AppState>, state: AppState) -> Router {
    // Base64 inflates the payload by a third
    let body_limit = (state.config.max_file_size.saturating_mul(4) / 3)
        .saturating_add(BODY_LIMIT_SLACK);

    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            apply_cors_headers,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the server with the given state
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(state: AppState) -> anyhow::Result<()> {
    let router = app(state);

    let addr = std::net::SocketAddr::from((
        [0, 0, 0, 0],
        std::env::var("PORT").map_or(Ok(8080), |p| p.parse())?,
    ));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 Image Backend started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = err
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| err.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());

    tracing::error!("Handler panicked: {details}");
    AppError::internal().into_response()
}

/// Resolves on Ctrl+C or SIGTERM
///
/// # Panics
///
/// Panics if a signal handler cannot be installed
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        () = terminate => tracing::info!("Received terminate signal"),
    }

    tracing::info!("Shutting down gracefully...");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request, http::StatusCode, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        blob_store::MemoryBlobStore, identity::IdentityVerifier, image_service::ImageService,
        types::ServiceConfig,
    };

    #[allow(clippy::unused_async)]
    async fn explode() -> &'static str {
        panic!("handler exploded")
    }

    fn test_state() -> AppState {
        let config = ServiceConfig::default();
        let image_service = ImageService::new(
            Arc::new(MemoryBlobStore::default()),
            config.presigned_url_expiry,
        );
        AppState::new(image_service, IdentityVerifier::new("test-secret"), config)
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error_with_cors_headers() {
        let router = with_layers(Router::new().route("/explode", get(explode)), test_state());

        let request = Request::builder()
            .uri("/explode")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["content-type"], "application/json");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Internal server error"}));
    }

    #[test]
    fn test_handle_panic_accepts_any_payload() {
        for payload in [
            Box::new("static message") as Box<dyn Any + Send>,
            Box::new(String::from("owned message")),
            Box::new(42_u32),
        ] {
            let response = handle_panic(payload);
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
