//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → body limit (http::server, from security.max_body_size)
//!     → handlers
//!     → headers.rs (security headers on the way out)
//! ```
//!
//! Authentication is out of scope; this is a development tool.

pub mod headers;
