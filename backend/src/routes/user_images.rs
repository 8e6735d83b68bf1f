use std::borrow::Cow;
use std::str::FromStr;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{error, info, instrument, warn};
use validator::{Validate, ValidationError};

use super::images::ImagesResponse;
use crate::{
    image_service::{
        decode_inbound_image, DeleteRequest, DeleteResult, ImageExtension, UploadRequest,
        UploadResult,
    },
    middleware::AuthenticatedUser,
    state::AppState,
    types::{ApiResponse, AppError, ValidatedJson},
};

/// Header flagging a base64-encoded request body
const CONTENT_TRANSFER_ENCODING: &str = "content-transfer-encoding";

/// Header naming the uploaded file when the body is the raw image
const FILENAME_HEADER: &str = "x-filename";

/// Suffixes accepted by the delete route
const DELETABLE_SUFFIXES: [&str; 3] = [".jpg", ".jpeg", ".png"];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub image_url: String,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub user_id: String,
    pub image_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DeleteImageBody {
    /// Name of the image within the caller's prefix, e.g. `20250101_120000_000000_ab12cd34.png`
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "validate_image_name"))]
    pub image_name: String,
}

/// Reads `null` as an empty name
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn validate_image_name(image_name: &str) -> Result<(), ValidationError> {
    if image_name.is_empty() {
        return Err(ValidationError::new("missing_image_name").with_message(Cow::Borrowed(
            "'image_name' field is required in request body",
        )));
    }

    // A slash would address keys outside the caller's flat namespace
    if image_name.contains('/')
        || !DELETABLE_SUFFIXES
            .iter()
            .any(|suffix| image_name.ends_with(suffix))
    {
        return Err(
            ValidationError::new("invalid_image_name").with_message(Cow::Borrowed(
                "Invalid image name format. Allowed formats: .jpg, .jpeg, .png",
            )),
        );
    }

    Ok(())
}

/// Lists the caller's images as presigned URLs
#[instrument(skip_all, fields(user_id = %user.user_id()))]
pub async fn list_user_images(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResponse<ImagesResponse> {
    info!("Fetching images for user");

    let images = state.image_service.list_for_user(user.user_id()).await;

    ApiResponse::ok(ImagesResponse { images })
}

/// Uploads an image into the caller's prefix
///
/// The body may be the raw image, a bare base64 string, or
/// `{"image": <base64>, "filename": "name.ext"}`. A `Content-Transfer-Encoding: base64`
/// header marks the whole body as base64 and `X-Filename` names a raw upload.
///
/// # Errors
///
/// - 400 when the body holds no decodable image, the extension is not allowed, or
///   the image exceeds the configured size
/// - 500 when storage fails
#[instrument(skip_all, fields(user_id = %user.user_id()))]
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<ApiResponse<UploadResponse>, AppError> {
    let max_file_size = state.config.max_file_size;
    let too_large = || {
        AppError::bad_request(format!(
            "File size exceeds maximum allowed size of {max_file_size} bytes"
        ))
    };

    let body = body.map_err(|rejection| {
        warn!("Failed to read upload body: {rejection}");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            too_large()
        } else {
            AppError::bad_request("Invalid request body")
        }
    })?;

    let is_base64_encoded = headers
        .get(CONTENT_TRANSFER_ENCODING)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim().eq_ignore_ascii_case("base64"));
    let filename = headers
        .get(FILENAME_HEADER)
        .and_then(|value| value.to_str().ok());

    let decoded = decode_inbound_image(&body, is_base64_encoded, filename)
        .ok_or_else(|| AppError::bad_request("No valid image data found in request"))?;

    let extension = ImageExtension::from_str(&decoded.extension)
        .ok()
        .filter(|extension| state.config.is_extension_allowed(*extension))
        .ok_or_else(|| {
            AppError::bad_request(format!("File type '{}' not allowed", decoded.extension))
        })?;

    if decoded.bytes.len() > max_file_size {
        return Err(too_large());
    }

    info!("Uploading {} bytes as {extension}", decoded.bytes.len());
    let request = UploadRequest::new(user.identity.id, decoded.bytes, extension);

    match state.image_service.upload(request).await {
        UploadResult::Uploaded {
            image_url,
            message,
            user_id,
        } => Ok(ApiResponse::ok(UploadResponse {
            message,
            image_url,
            user_id,
        })),
        UploadResult::Failed { message, .. } => {
            error!("Upload failed: {message}");
            Err(AppError::internal_with("Failed to upload image"))
        }
    }
}

/// Deletes one of the caller's images, named by the JSON body
///
/// # Errors
///
/// - 400 when the body is missing, unparsable or names an invalid image
/// - 404 when the image does not exist
/// - 500 when storage fails
#[instrument(skip_all, fields(user_id = %user.user_id()))]
pub async fn delete_image(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(body): ValidatedJson<DeleteImageBody>,
) -> Result<ApiResponse<DeleteResponse>, AppError> {
    info!("Deleting image {}", body.image_name);

    let request = DeleteRequest {
        user_id: user.identity.id,
        image_name: body.image_name.clone(),
    };

    match state.image_service.delete(request).await {
        DeleteResult::Deleted { message, user_id } => Ok(ApiResponse::ok(DeleteResponse {
            message,
            user_id,
            image_name: body.image_name,
        })),
        DeleteResult::NotFound { message, .. } => Err(AppError::not_found(message)),
        DeleteResult::Failed { message, .. } => {
            error!("Delete failed: {message}");
            Err(AppError::internal_with("Failed to delete image"))
        }
    }
}
