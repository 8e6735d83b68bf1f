//! Request and result values exchanged with the image service

use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

/// Image file extensions accepted by the service
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ImageExtension {
    Jpg,
    Jpeg,
    Png,
    Gif,
    Webp,
    Bmp,
    Tiff,
}

impl ImageExtension {
    /// MIME type stored alongside the object
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Jpg | Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }
}

/// A validated upload
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub user_id: String,
    pub image_bytes: Vec<u8>,
    pub content_type: String,
    pub file_extension: ImageExtension,
}

impl UploadRequest {
    /// Builds an upload whose content type follows from the extension
    #[must_use]
    pub fn new(user_id: impl Into<String>, image_bytes: Vec<u8>, file_extension: ImageExtension) -> Self {
        Self {
            user_id: user_id.into(),
            image_bytes,
            content_type: file_extension.content_type().to_string(),
            file_extension,
        }
    }
}

/// A request to delete one of the caller's images
#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub user_id: String,
    pub image_name: String,
}

/// A stored image exposed through a time-limited URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    /// Final path segment of the object key
    pub name: String,
    pub presigned_url: String,
}

/// Outcome of [`super::ImageService::upload`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    Uploaded {
        image_url: String,
        message: String,
        user_id: String,
    },
    Failed {
        message: String,
        user_id: String,
    },
}

impl UploadResult {
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self, Self::Uploaded { .. })
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Uploaded { message, .. } | Self::Failed { message, .. } => message,
        }
    }
}

/// Outcome of [`super::ImageService::delete`]
///
/// `NotFound` is its own variant so callers never have to inspect the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteResult {
    Deleted { message: String, user_id: String },
    NotFound { message: String, user_id: String },
    Failed { message: String, user_id: String },
}

impl DeleteResult {
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self, Self::Deleted { .. })
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Deleted { message, .. }
            | Self::NotFound { message, .. }
            | Self::Failed { message, .. } => message,
        }
    }
}
