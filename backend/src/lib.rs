//! Image management backend
//!
//! Authenticates callers with HS256 bearer tokens, stores uploaded images in S3
//! under a per-user prefix, lists images as presigned read URLs and deletes
//! images by name.

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

/// Object storage gateway
pub mod blob_store;

/// Bearer token verification
pub mod identity;

/// Image domain service
pub mod image_service;

/// Request extractors and response middleware
pub mod middleware;

/// HTTP routes
pub mod routes;

/// Router assembly and server startup
pub mod server;

/// Shared application state
pub mod state;

/// Configuration, errors and response types
pub mod types;
