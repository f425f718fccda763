//! Configurable HTTP mock server library.
//!
//! Clients register `METHOD + path pattern` routes with one or more canned
//! JSON responses; every other request is matched against those patterns
//! and answered with a selected, rendered response.

pub mod admin;
pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod responses;
pub mod routing;
pub mod security;
pub mod storage;

pub use config::MockServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use registry::MockRegistry;
