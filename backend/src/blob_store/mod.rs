//! Object storage gateway
//!
//! [`BlobStore`] wraps a key-addressed object store scoped to one bucket. Backends
//! implement the primitives; the listing, presigning and delete policies are shared
//! provided methods so every backend behaves the same way:
//! - listing fails open (errors are logged and yield an empty list)
//! - read URL generation yields `None` on failure
//! - delete probes for the object first, because the underlying delete is
//!   idempotent and silent on missing keys

mod error;
#[cfg(any(test, feature = "test-utils"))]
mod memory;
mod s3;

use std::time::Duration;

use async_trait::async_trait;

pub use error::{BlobStoreError, BlobStoreResult};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::{MemoryBlobStore, MemoryObject};
pub use s3::S3BlobStore;

/// A stored object as returned by listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Full object key, e.g. `user-1/20250101_120000_000000_ab12cd34.png`
    pub key: String,
    /// Object size in bytes
    pub size: u64,
}

/// Outcome of a delete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The object existed and was removed
    Deleted,
    /// No object exists under the key
    NotFound,
    /// The storage service failed; the reason is for logs only
    Failed(String),
}

/// Key-addressed blob storage scoped to a single bucket
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `key` with the given content type
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> BlobStoreResult<()>;

    /// Lists every object, optionally restricted to a key prefix
    async fn list_objects(&self, prefix: Option<&str>) -> BlobStoreResult<Vec<ObjectSummary>>;

    /// Generates a time-limited read URL for `key`
    async fn presign_get(&self, key: &str, ttl: Duration) -> BlobStoreResult<String>;

    /// Whether an object exists under `key`
    async fn head_exists(&self, key: &str) -> BlobStoreResult<bool>;

    /// Removes the object under `key`; succeeds whether or not it existed
    async fn delete_object(&self, key: &str) -> BlobStoreResult<()>;

    /// Canonical (non-presigned) URL of the object under `key`
    fn object_url(&self, key: &str) -> String;

    /// Lists objects under `prefix`, returning an empty list on failure
    async fn list_by_prefix(&self, prefix: &str) -> Vec<ObjectSummary> {
        self.list_objects(Some(prefix))
            .await
            .unwrap_or_else(|err| {
                tracing::error!("Failed to list objects under {prefix}: {err}");
                Vec::new()
            })
    }

    /// Lists the whole bucket, returning an empty list on failure
    async fn list_all(&self) -> Vec<ObjectSummary> {
        self.list_objects(None).await.unwrap_or_else(|err| {
            tracing::error!("Failed to list objects: {err}");
            Vec::new()
        })
    }

    /// Generates a read URL, or `None` if presigning fails
    async fn generate_read_url(&self, key: &str, ttl: Duration) -> Option<String> {
        match self.presign_get(key, ttl).await {
            Ok(url) => Some(url),
            Err(err) => {
                tracing::warn!("Failed to generate presigned URL for {key}: {err}");
                None
            }
        }
    }

    /// Deletes `key`, distinguishing a missing object from other failures
    async fn delete(&self, key: &str) -> DeleteOutcome {
        match self.head_exists(key).await {
            Ok(false) => DeleteOutcome::NotFound,
            Ok(true) => match self.delete_object(key).await {
                Ok(()) => DeleteOutcome::Deleted,
                Err(err) => DeleteOutcome::Failed(err.to_string()),
            },
            Err(err) => DeleteOutcome::Failed(err.to_string()),
        }
    }
}
