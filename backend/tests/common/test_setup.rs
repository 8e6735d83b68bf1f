use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use image_backend::{
    blob_store::MemoryBlobStore, identity::IdentityVerifier, image_service::ImageService,
    server, state::AppState, types::ServiceConfig,
};
use tower::ServiceExt;

use super::create_token;

/// Secret every test token is signed with
pub const TEST_SECRET: &str = "test-secret";

/// Region on the allow-list of the default test configuration
pub const TEST_REGION: &str = "US-EAST-1";

/// Setup test environment
pub fn setup_test_env() {
    // Initialize tracing for tests
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();
}

/// Configuration used unless a test supplies its own
pub fn test_config() -> ServiceConfig {
    ServiceConfig {
        allowed_regions: vec![TEST_REGION.to_string(), "EU-WEST-1".to_string()],
        ..ServiceConfig::default()
    }
}

/// Router over an in-memory blob store
pub struct TestSetup {
    pub router: Router,
    pub store: Arc<MemoryBlobStore>,
    pub config: ServiceConfig,
}

impl TestSetup {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: ServiceConfig) -> Self {
        setup_test_env();

        let store = Arc::new(MemoryBlobStore::new("test-bucket"));
        let image_service = ImageService::new(store.clone(), config.presigned_url_expiry);
        let identity_verifier = IdentityVerifier::new(TEST_SECRET);

        let router = server::app(AppState::new(
            image_service,
            identity_verifier,
            config.clone(),
        ));

        Self {
            router,
            store,
            config,
        }
    }

    /// Bearer header value for `user_id`
    pub fn bearer(user_id: &str) -> String {
        format!(
            "Bearer {}",
            create_token(&serde_json::json!({ "id": user_id }))
        )
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn send_request(
        &self,
        method: Method,
        route: &str,
        headers: &[(&str, &str)],
        body: impl Into<Body>,
    ) -> Response {
        let mut builder = Request::builder().uri(route).method(method);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(body.into()).expect("valid request");
        self.send(request).await
    }

    pub async fn send_get_request(&self, route: &str, headers: &[(&str, &str)]) -> Response {
        self.send_request(Method::GET, route, headers, Body::empty())
            .await
    }

    /// PUT `/images/user` as `user_id`
    pub async fn upload_as(
        &self,
        user_id: &str,
        extra_headers: &[(&str, &str)],
        body: impl Into<Body>,
    ) -> Response {
        let bearer = Self::bearer(user_id);
        let mut headers = vec![("authorization", bearer.as_str())];
        headers.extend_from_slice(extra_headers);
        self.send_request(Method::PUT, "/images/user", &headers, body)
            .await
    }

    /// DELETE `/images/user` as `user_id` with a JSON body
    pub async fn delete_as(&self, user_id: &str, body: impl Into<Body>) -> Response {
        let bearer = Self::bearer(user_id);
        self.send_request(
            Method::DELETE,
            "/images/user",
            &[
                ("authorization", bearer.as_str()),
                ("content-type", "application/json"),
            ],
            body,
        )
        .await
    }

    /// GET `/images/user` as `user_id`
    pub async fn list_as(&self, user_id: &str) -> Response {
        let bearer = Self::bearer(user_id);
        self.send_get_request("/images/user", &[("authorization", bearer.as_str())])
            .await
    }
}
