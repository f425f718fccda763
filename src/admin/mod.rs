//! Mock management API.
//!
//! Each management path is served under both its dashed and its nested
//! spelling (`/mock-routes` and `/mock/routes`). Methods a path does not
//! serve fall through to the mock catch-all, as do all unknown paths.

pub mod handlers;

use axum::{
    routing::{delete, get, post, MethodRouter},
    Router,
};
use serde::Serialize;

use self::handlers::*;
use crate::http::server::{mock_handler, AppState};

/// A framework-level route, as reported by the debug endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ServerRoute {
    pub path: &'static str,
    pub methods: &'static [&'static str],
}

/// Every route served outside the mock catch-all.
pub const SERVER_ROUTES: &[ServerRoute] = &[
    ServerRoute { path: "/mock-register", methods: &["post"] },
    ServerRoute { path: "/mock/register", methods: &["post"] },
    ServerRoute { path: "/mock-routes", methods: &["get"] },
    ServerRoute { path: "/mock/routes", methods: &["get"] },
    ServerRoute { path: "/mock-routes/{responseId}", methods: &["delete"] },
    ServerRoute { path: "/mock/routes/{responseId}", methods: &["delete"] },
    ServerRoute { path: "/mock/flush", methods: &["delete"] },
    ServerRoute { path: "/debug/routes", methods: &["get"] },
    ServerRoute { path: "/system/debug/routes", methods: &["get"] },
    ServerRoute { path: "/health", methods: &["get"] },
    ServerRoute { path: "/system/health", methods: &["get"] },
];

/// Send methods the route does not serve to the mock catch-all.
pub(crate) fn or_mock(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.fallback(mock_handler)
}

pub fn setup_admin_router() -> Router<AppState> {
    Router::new()
        .route("/mock-register", or_mock(post(register_mock)))
        .route("/mock/register", or_mock(post(register_mock)))
        .route("/mock-routes", or_mock(get(list_mocks)))
        .route("/mock/routes", or_mock(get(list_mocks)))
        .route("/mock-routes/{responseId}", or_mock(delete(delete_mock_response)))
        .route("/mock/routes/{responseId}", or_mock(delete(delete_mock_response)))
        .route("/mock/flush", or_mock(delete(flush_mocks)))
        .route("/debug/routes", or_mock(get(debug_routes)))
        .route("/system/debug/routes", or_mock(get(debug_routes)))
}
