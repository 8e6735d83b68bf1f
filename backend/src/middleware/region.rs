use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{state::AppState, types::AppError};

/// Header naming the caller's region
pub const REGION_HEADER: &str = "x-region";

/// Region of a caller whose `x-region` header is on the configured allow-list
#[derive(Debug, Clone)]
pub struct AllowedRegion(pub String);

impl FromRequestParts<AppState> for AllowedRegion {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(region) = parts
            .headers
            .get(REGION_HEADER)
            .and_then(|value| value.to_str().ok())
        else {
            return Err(AppError::forbidden("Region not allowed"));
        };

        if !state.config.is_region_allowed(region) {
            return Err(AppError::forbidden(format!("Region {region} not allowed")));
        }

        Ok(Self(region.trim().to_string()))
    }
}
