//! Application state management

use std::sync::Arc;

use crate::{identity::IdentityVerifier, image_service::ImageService, types::ServiceConfig};

/// Application state shared across handlers
///
/// Holds only immutable collaborators; nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Image domain service backed by the blob store
    pub image_service: Arc<ImageService>,
    /// Bearer token verifier
    pub identity_verifier: Arc<IdentityVerifier>,
    /// Runtime configuration
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    /// Creates application state from its collaborators
    #[must_use]
    pub fn new(
        image_service: ImageService,
        identity_verifier: IdentityVerifier,
        config: ServiceConfig,
    ) -> Self {
        Self {
            image_service: Arc::new(image_service),
            identity_verifier: Arc::new(identity_verifier),
            config: Arc::new(config),
        }
    }
}
