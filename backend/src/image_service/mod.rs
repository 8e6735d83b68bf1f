//! Image domain service
//!
//! Mediates between validated request values and the [`BlobStore`]. Every object lives
//! under `{user_id}/{image_name}`, which is the only isolation boundary between users.
//! No operation here returns an error: storage failures become failure variants or,
//! for listings, empty results.

mod decode;
mod models;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::blob_store::{BlobStore, DeleteOutcome, ObjectSummary};

pub use decode::{decode_inbound_image, DecodedImage, DEFAULT_EXTENSION};
pub use models::{
    DeleteRequest, DeleteResult, ImageExtension, ImageRef, UploadRequest, UploadResult,
};

/// Image operations scoped per user
pub struct ImageService {
    store: Arc<dyn BlobStore>,
    read_url_ttl: Duration,
}

impl ImageService {
    /// Creates a new image service
    ///
    /// # Arguments
    ///
    /// * `store` - Blob store holding the images
    /// * `read_url_ttl` - Lifetime of the presigned URLs handed out by listings
    #[must_use]
    pub fn new(store: Arc<dyn BlobStore>, read_url_ttl: Duration) -> Self {
        Self {
            store,
            read_url_ttl,
        }
    }

    /// Stores an image under a freshly generated name in the user's prefix
    #[instrument(skip(self, request), fields(user_id = %request.user_id, extension = %request.file_extension))]
    pub async fn upload(&self, request: UploadRequest) -> UploadResult {
        let image_name = generate_image_name(request.file_extension, Utc::now());
        let key = storage_key(&request.user_id, &image_name);

        match self
            .store
            .put(&key, request.image_bytes, &request.content_type)
            .await
        {
            Ok(()) => {
                info!("Uploaded {key}");
                UploadResult::Uploaded {
                    image_url: self.store.object_url(&key),
                    message: format!("Image uploaded successfully as {image_name}"),
                    user_id: request.user_id,
                }
            }
            Err(err) => UploadResult::Failed {
                message: format!("Failed to upload image: {err}"),
                user_id: request.user_id,
            },
        }
    }

    /// Deletes one of the user's images by name
    #[instrument(skip(self, request), fields(user_id = %request.user_id, image_name = %request.image_name))]
    pub async fn delete(&self, request: DeleteRequest) -> DeleteResult {
        let key = storage_key(&request.user_id, &request.image_name);
        let DeleteRequest {
            user_id,
            image_name,
        } = request;

        match self.store.delete(&key).await {
            DeleteOutcome::Deleted => {
                info!("Deleted {key}");
                DeleteResult::Deleted {
                    message: format!("Image {image_name} deleted successfully"),
                    user_id,
                }
            }
            DeleteOutcome::NotFound => DeleteResult::NotFound {
                message: format!("Image {image_name} not found"),
                user_id,
            },
            DeleteOutcome::Failed(reason) => DeleteResult::Failed {
                message: format!("Failed to delete image: {reason}"),
                user_id,
            },
        }
    }

    /// Lists the user's images with presigned read URLs
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: &str) -> Vec<ImageRef> {
        let objects = self.store.list_by_prefix(&format!("{user_id}/")).await;
        info!("Found {} images", objects.len());
        self.with_read_urls(objects).await
    }

    /// Lists every image in the bucket, skipping zero-size directory markers
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Vec<ImageRef> {
        let objects: Vec<ObjectSummary> = self
            .store
            .list_all()
            .await
            .into_iter()
            .filter(|object| object.size > 0)
            .collect();
        info!("Found {} images in total", objects.len());
        self.with_read_urls(objects).await
    }

    async fn with_read_urls(&self, objects: Vec<ObjectSummary>) -> Vec<ImageRef> {
        let mut images = Vec::with_capacity(objects.len());
        for object in objects {
            let Some(presigned_url) = self
                .store
                .generate_read_url(&object.key, self.read_url_ttl)
                .await
            else {
                warn!("Skipping {} without a read URL", object.key);
                continue;
            };

            images.push(ImageRef {
                name: image_name_of(&object.key).to_string(),
                presigned_url,
            });
        }
        images
    }
}

/// Storage key of an image: `{user_id}/{image_name}`
#[must_use]
pub fn storage_key(user_id: &str, image_name: &str) -> String {
    format!("{user_id}/{image_name}")
}

/// Generates `{YYYYMMDD_HHMMSS_ffffff}_{8 hex}.{ext}` for an upload at `now`
///
/// The random suffix keeps names unique when one user uploads twice within a microsecond.
#[must_use]
pub fn generate_image_name(extension: ImageExtension, now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}.{extension}",
        now.format("%Y%m%d_%H%M%S_%6f"),
        &suffix[..8]
    )
}

fn image_name_of(key: &str) -> &str {
    key.rsplit_once('/').map_or(key, |(_, name)| name)
}
