//! Error types for blob store operations

use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use thiserror::Error;

/// Result type for blob store operations
pub type BlobStoreResult<T> = Result<T, BlobStoreError>;

/// Errors that can occur during blob store operations
#[derive(Error, Debug)]
pub enum BlobStoreError {
    /// The storage service rejected the request
    #[error("Storage service error: {0}")]
    Backend(String),

    /// Upstream service error (5xx from the storage service)
    #[error("Upstream service error: {0}")]
    Upstream(String),

    /// The request never produced a service response (timeout, dispatch, construction)
    #[error("Storage transport error: {0}")]
    Transport(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl<E> From<SdkError<E>> for BlobStoreError
where
    E: std::error::Error + 'static,
{
    fn from(error: SdkError<E>) -> Self {
        let detail = DisplayErrorContext(&error).to_string();
        match &error {
            SdkError::ServiceError(service_err) if service_err.raw().status().as_u16() >= 500 => {
                Self::Upstream(detail)
            }
            SdkError::ServiceError(_) => Self::Backend(detail),
            _ => Self::Transport(detail),
        }
    }
}
