//! Security response headers.
//!
//! # Responsibilities
//! - Add `X-Content-Type-Options`, `X-Frame-Options`, `X-XSS-Protection`
//!   to every response, mock responses included
//!
//! # Design Decisions
//! - Headers are overridden, so a handler cannot weaken them
//! - Disabled entirely via `security.enable_headers = false`

use axum::http::{header, HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::SecurityConfig;

/// Headers applied when security headers are enabled.
pub fn security_headers() -> [(HeaderName, HeaderValue); 3] {
    [
        (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
        (header::X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block")),
    ]
}

/// Wrap `router` with the security header layers if enabled.
pub fn apply_security_headers(router: Router, config: &SecurityConfig) -> Router {
    if !config.enable_headers {
        return router;
    }

    security_headers()
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::overriding(name, value))
        })
}
