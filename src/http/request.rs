//! Request helpers.
//!
//! # Responsibilities
//! - Read the request ID set by middleware
//! - Parse JSON bodies leniently (empty body → defaults)
//!
//! # Design Decisions
//! - Malformed JSON is a validation error with our own JSON shape, not the
//!   framework's plain-text rejection

use axum::body::Bytes;
use axum::http::HeaderMap;
use serde::de::DeserializeOwned;

use crate::http::response::ApiError;

/// Header carrying the per-request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID assigned by the request-id middleware.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Deserialize a JSON body; an empty body yields `T::default()`.
pub fn parse_json_body<T>(body: &Bytes) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::validation(format!("Invalid JSON body: {e}")))
}
