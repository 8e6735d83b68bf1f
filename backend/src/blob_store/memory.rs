//! In-memory blob store for tests

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::{BlobStore, BlobStoreError, BlobStoreResult, ObjectSummary};

/// An object held by [`MemoryBlobStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryObject {
    /// Object content
    pub bytes: Vec<u8>,
    /// Content type given at upload
    pub content_type: String,
}

/// Blob store backed by a map, with switchable failures
pub struct MemoryBlobStore {
    bucket_name: String,
    objects: Mutex<BTreeMap<String, MemoryObject>>,
    presign_failures: Mutex<HashSet<String>>,
    fail_puts: AtomicBool,
    fail_listing: AtomicBool,
    fail_deletes: AtomicBool,
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new("memory-bucket")
    }
}

impl MemoryBlobStore {
    /// Creates an empty store
    #[must_use]
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            objects: Mutex::default(),
            presign_failures: Mutex::default(),
            fail_puts: AtomicBool::new(false),
            fail_listing: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }

    /// Seeds an object directly
    pub fn insert(&self, key: &str, bytes: Vec<u8>, content_type: &str) {
        self.objects().insert(
            key.to_string(),
            MemoryObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
    }

    /// Returns a copy of the object under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<MemoryObject> {
        self.objects().get(key).cloned()
    }

    /// Whether an object exists under `key`
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.objects().contains_key(key)
    }

    /// All stored keys in lexical order
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.objects().keys().cloned().collect()
    }

    /// Makes every `put` fail
    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Makes every listing fail
    pub fn set_fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    /// Makes every `delete_object` fail
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Makes presigning fail for one key
    pub fn fail_presign_for(&self, key: &str) {
        self.presign_failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string());
    }

    fn objects(&self) -> MutexGuard<'_, BTreeMap<String, MemoryObject>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> BlobStoreResult<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(BlobStoreError::Backend("put rejected".to_string()));
        }
        self.insert(key, bytes, content_type);
        Ok(())
    }

    async fn list_objects(&self, prefix: Option<&str>) -> BlobStoreResult<Vec<ObjectSummary>> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(BlobStoreError::Upstream("listing unavailable".to_string()));
        }

        Ok(self
            .objects()
            .iter()
            .filter(|(key, _)| prefix.is_none_or(|prefix| key.starts_with(prefix)))
            .map(|(key, object)| ObjectSummary {
                key: key.clone(),
                size: object.bytes.len() as u64,
            })
            .collect())
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> BlobStoreResult<String> {
        let failing = self
            .presign_failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key);
        if failing {
            return Err(BlobStoreError::Config(format!("cannot presign {key}")));
        }

        Ok(format!(
            "{}?expires_in={}",
            self.object_url(key),
            ttl.as_secs()
        ))
    }

    async fn head_exists(&self, key: &str) -> BlobStoreResult<bool> {
        Ok(self.contains(key))
    }

    async fn delete_object(&self, key: &str) -> BlobStoreResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(BlobStoreError::Backend("delete rejected".to_string()));
        }
        self.objects().remove(key);
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        format!("memory://{}/{key}", self.bucket_name)
    }
}
