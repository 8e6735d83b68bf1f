//! S3-backed blob store

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::{
    error::SdkError, operation::head_object::HeadObjectError, presigning::PresigningConfig,
    primitives::ByteStream, Client as S3Client,
};
use tracing::{debug, instrument};

use super::{BlobStore, BlobStoreError, BlobStoreResult, ObjectSummary};

/// Blob store client for one S3 bucket
pub struct S3BlobStore {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    object_url_base: String,
}

impl S3BlobStore {
    /// Creates a new S3 blob store
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - Bucket holding every user's images
    /// * `object_url_base` - Base URL that canonical object URLs are built on
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, bucket_name: String, object_url_base: String) -> Self {
        Self {
            s3_client,
            bucket_name,
            object_url_base,
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    #[instrument(skip(self, bytes))]
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> BlobStoreResult<()> {
        self.s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await?;

        debug!("Stored object {key}");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_objects(&self, prefix: Option<&str>) -> BlobStoreResult<Vec<ObjectSummary>> {
        let mut request = self.s3_client.list_objects_v2().bucket(&self.bucket_name);
        if let Some(prefix) = prefix {
            request = request.prefix(prefix);
        }

        let mut pages = request.into_paginator().send();
        let mut objects = Vec::new();

        while let Some(page) = pages.next().await {
            let page = page?;
            objects.extend(page.contents().iter().filter_map(|object| {
                Some(ObjectSummary {
                    key: object.key()?.to_string(),
                    size: object
                        .size()
                        .and_then(|size| u64::try_from(size).ok())
                        .unwrap_or_default(),
                })
            }));
        }

        debug!("Listed {} objects", objects.len());
        Ok(objects)
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> BlobStoreResult<String> {
        let presigned_config = PresigningConfig::expires_in(ttl).map_err(|e| {
            BlobStoreError::Config(format!("Failed to create presigning config: {e}"))
        })?;

        let presigned_request = self
            .s3_client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .presigned(presigned_config)
            .await?;

        Ok(presigned_request.uri().to_string())
    }

    /// Checks if an object exists in the bucket
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if object exists
    /// * `Ok(false)` if object does not exist
    /// * `Err(BlobStoreError)` if the S3 operation fails
    async fn head_exists(&self, key: &str) -> BlobStoreResult<bool> {
        let result = self
            .s3_client
            .head_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(service_err))
                if matches!(service_err.err(), HeadObjectError::NotFound(_)) =>
            {
                Ok(false)
            }
            Err(e) => Err(BlobStoreError::from(e)),
        }
    }

    #[instrument(skip(self))]
    async fn delete_object(&self, key: &str) -> BlobStoreResult<()> {
        self.s3_client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await?;

        debug!("Deleted object {key}");
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{key}", self.object_url_base)
    }
}
