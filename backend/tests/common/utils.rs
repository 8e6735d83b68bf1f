use axum::response::Response;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};

use super::TEST_SECRET;

/// A 1x1 transparent PNG
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Sign `claims` with the test secret (HS256), adding a one-hour `exp` when absent
pub fn create_token(claims: &serde_json::Value) -> String {
    let mut claims = claims.clone();
    if claims.get("exp").is_none() {
        claims["exp"] = serde_json::json!(Utc::now().timestamp() + 3600);
    }
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

/// JSON upload body `{"image": <base64>, "filename": ...}`
pub fn json_upload_body(bytes: &[u8], filename: Option<&str>) -> String {
    let mut body = serde_json::json!({ "image": STANDARD.encode(bytes) });
    if let Some(filename) = filename {
        body["filename"] = serde_json::json!(filename);
    }
    body.to_string()
}

/// Image names under `{user_id}/` currently in the store
pub fn stored_names(keys: &[String], user_id: &str) -> Vec<String> {
    let prefix = format!("{user_id}/");
    keys.iter()
        .filter_map(|key| key.strip_prefix(&prefix))
        .map(ToString::to_string)
        .collect()
}
