//! Best-effort reading of claims from a bearer token.
//!
//! Tokens are issued and verified by the external auth service. This module
//! only peeks at the payload to show who is signed in; the signature is
//! **not** checked, so nothing read here may be used for authorization.

use base64::alphabet::URL_SAFE;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde_json::{Map, Value};

/// URL-safe base64 that accepts payload segments with or without padding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Number of dot-separated segments in a compact JWS.
const SEGMENT_COUNT: usize = 3;

/// Decode the payload segment of a token into its claim set.
///
/// Returns `None` if the token does not have exactly three segments, the
/// payload is not valid base64url, or it does not decode to a JSON object.
pub fn decode_claims(token: &str) -> Option<Map<String, Value>> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != SEGMENT_COUNT {
        return None;
    }
    let bytes = PAYLOAD_ENGINE.decode(segments[1]).ok()?;
    match serde_json::from_slice::<Value>(&bytes).ok()? {
        Value::Object(claims) => Some(claims),
        _ => None,
    }
}

/// Extract the `sub` claim for display.
///
/// A string subject is returned as-is (empty strings count as absent); a
/// numeric subject is rendered in decimal. Every malformed input yields
/// `None`. Never use the result for authorization decisions.
pub fn extract_subject_claim(token: &str) -> Option<String> {
    match decode_claims(token)?.remove("sub")? {
        Value::String(sub) if !sub.is_empty() => Some(sub),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The signed-in user's display name, or `fallback` when there is no
/// readable subject.
pub fn display_name(token: Option<&str>, fallback: &str) -> String {
    token
        .and_then(extract_subject_claim)
        .unwrap_or_else(|| fallback.to_string())
}
