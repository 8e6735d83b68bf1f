use axum::extract::State;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    image_service::ImageRef, middleware::AllowedRegion, state::AppState, types::ApiResponse,
};

#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    pub images: Vec<ImageRef>,
}

/// Lists every image in the bucket as presigned URLs
///
/// Only callers whose `x-region` header is on the allow-list get through; listing
/// failures yield an empty gallery rather than an error.
#[instrument(skip_all)]
pub async fn list_all_images(
    State(state): State<AppState>,
    AllowedRegion(region): AllowedRegion,
) -> ApiResponse<ImagesResponse> {
    info!("Fetching all images from region: {region}");

    let images = state.image_service.list_all().await;

    ApiResponse::ok(ImagesResponse { images })
}
