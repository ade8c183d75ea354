//! JWT claim decoding
//!
//! Claims are read without signature verification. The tokens come straight
//! from the token endpoint over TLS and are only used to derive storage keys;
//! the downstream API verifies them on every request.

use crate::utils::logging::LoggingHelper;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde_json::{Map, Value};
use std::fmt;

/// Decoded JWT payload
pub type Claims = Map<String, Value>;

/// Standard alphabet, padding optional. URL-safe input is mapped onto it first.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Reason a token could not be decoded. Never leaves this module.
#[derive(Debug)]
enum TokenDecodeError {
    Empty,
    Segments(usize),
    Base64(base64::DecodeError),
    Json(serde_json::Error),
    NotAnObject,
}

impl fmt::Display for TokenDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenDecodeError::Empty => write!(f, "token is empty"),
            TokenDecodeError::Segments(n) => write!(f, "expected 3 segments, found {n}"),
            TokenDecodeError::Base64(e) => write!(f, "payload is not valid base64: {e}"),
            TokenDecodeError::Json(e) => write!(f, "payload is not valid JSON: {e}"),
            TokenDecodeError::NotAnObject => write!(f, "payload is not a JSON object"),
        }
    }
}

/// Decode the payload segment of a compact JWT
///
/// Returns `None` for empty input, a token without exactly three segments, or
/// a payload that is not base64 encoded JSON object. The failure is logged
/// and never raised.
#[must_use]
pub fn decode_claims(token: &str) -> Option<Claims> {
    match try_decode_claims(token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            LoggingHelper::log_token_decode_failure(&e.to_string());
            None
        }
    }
}

fn try_decode_claims(token: &str) -> Result<Claims, TokenDecodeError> {
    if token.trim().is_empty() {
        return Err(TokenDecodeError::Empty);
    }

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenDecodeError::Segments(segments.len()));
    }

    let payload = segments[1].replace('-', "+").replace('_', "/");
    let bytes = PAYLOAD_ENGINE
        .decode(payload.as_bytes())
        .map_err(TokenDecodeError::Base64)?;

    match serde_json::from_slice::<Value>(&bytes).map_err(TokenDecodeError::Json)? {
        Value::Object(claims) => Ok(claims),
        _ => Err(TokenDecodeError::NotAnObject),
    }
}

/// Claim usable as a storage key segment
///
/// Non-empty strings are taken as is and numbers in their JSON form, so a
/// numeric `sub` still names its session keys. Anything else counts as absent.
#[must_use]
pub fn claim_key(claims: &Claims, name: &str) -> Option<String> {
    match claims.get(name)? {
        Value::String(v) if !v.is_empty() => Some(v.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
