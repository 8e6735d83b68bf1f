//! Inbound image payload decoding

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use tracing::debug;

/// Extension assumed when nothing names one
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Image bytes and the (lower-cased, not yet validated) extension they were sent with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub extension: String,
}

#[derive(Deserialize)]
struct JsonImagePayload {
    image: String,
    filename: Option<String>,
}

/// Extracts image bytes from a request body
///
/// Tried in order:
/// 1. a body flagged as base64 is decoded first
/// 2. a body that is not UTF-8 text is the image itself
/// 3. a text body of the form `{"image": <base64>, "filename": "x.png"}` yields the
///    decoded `image` with the filename's extension
/// 4. any other text body is decoded as bare base64, unless it was already decoded in step 1,
///    in which case the decoded text is the image
///
/// Outside of step 3 the extension comes from `explicit_filename`, defaulting to `jpg`.
/// Returns `None` when no attempt yields a non-empty image.
#[must_use]
pub fn decode_inbound_image(
    raw_body: &[u8],
    is_base64_encoded: bool,
    explicit_filename: Option<&str>,
) -> Option<DecodedImage> {
    let body = if is_base64_encoded {
        let Some(decoded) = decode_base64(raw_body) else {
            debug!("Body flagged as base64 could not be decoded");
            return None;
        };
        decoded
    } else {
        raw_body.to_vec()
    };

    let fallback_extension = || explicit_filename.map_or_else(|| DEFAULT_EXTENSION.to_string(), extension_of);

    let Ok(text) = std::str::from_utf8(&body) else {
        debug!("Body is binary, using it as the image");
        return non_empty(body, fallback_extension());
    };

    if let Ok(payload) = serde_json::from_str::<JsonImagePayload>(text) {
        debug!("Body is a JSON image payload");
        let extension = payload
            .filename
            .as_deref()
            .or(explicit_filename)
            .map_or_else(|| DEFAULT_EXTENSION.to_string(), extension_of);
        return non_empty(decode_base64(payload.image.as_bytes())?, extension);
    }

    if is_base64_encoded {
        return non_empty(body, fallback_extension());
    }

    debug!("Falling back to bare base64 decoding of the body");
    non_empty(decode_base64(text.as_bytes())?, fallback_extension())
}

/// Lower-cased suffix after the last dot, or the default when there is no dot
fn extension_of(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map_or_else(|| DEFAULT_EXTENSION.to_string(), |(_, ext)| ext.to_lowercase())
}

fn decode_base64(input: &[u8]) -> Option<Vec<u8>> {
    let compact: Vec<u8> = input
        .iter()
        .copied()
        .filter(|byte| !byte.is_ascii_whitespace())
        .collect();
    STANDARD.decode(compact).ok()
}

fn non_empty(bytes: Vec<u8>, extension: String) -> Option<DecodedImage> {
    (!bytes.is_empty()).then_some(DecodedImage { bytes, extension })
}
