//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with management, system and catch-all handlers
//! - Wire up middleware (tracing, request ID, body limit, panic capture,
//!   security headers)
//! - Bind server to listener and drain on shutdown
//! - Answer arbitrary requests from the mock table

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::admin;
use crate::config::MockServerConfig;
use crate::health;
use crate::http::request::request_id;
use crate::http::response::{ApiError, PanicResponder};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::registry::MockRegistry;
use crate::responses::{resolve, ResolveError, ResponsePicker, SeededPicker, ThreadRngPicker};
use crate::security::headers;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<MockRegistry>,
    pub picker: Arc<dyn ResponsePicker>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(registry: Arc<MockRegistry>, picker: Arc<dyn ResponsePicker>) -> Self {
        Self {
            registry,
            picker,
            started_at: Instant::now(),
        }
    }
}

/// Picker for the configured selection mode.
pub fn picker_from_config(config: &MockServerConfig) -> Arc<dyn ResponsePicker> {
    match config.selection.seed {
        Some(seed) => {
            tracing::info!(seed, "Using seeded response selection");
            Arc::new(SeededPicker::new(seed))
        }
        None => Arc::new(ThreadRngPicker),
    }
}

/// HTTP server for the mock engine.
pub struct HttpServer {
    router: Router,
    config: MockServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: MockServerConfig, registry: Arc<MockRegistry>, shutdown: &Shutdown) -> Self {
        let state = AppState::new(registry, picker_from_config(&config));
        let router = build_router(&config, state, shutdown);
        Self { router, config }
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            environment = %self.config.environment,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(config: &MockServerConfig, state: AppState, shutdown: &Shutdown) -> Router {
    let fail_fast = config.server.fail_fast.then(|| shutdown.clone());
    let panic_responder = PanicResponder::new(config.expose_errors(), fail_fast);

    let router = Router::new()
        .merge(admin::setup_admin_router())
        .merge(health::setup_system_router())
        .fallback(mock_handler)
        .with_state(state)
        // Replaces axum's 2 MiB default; body extractors reject past it.
        .layer(DefaultBodyLimit::max(config.security.max_body_size))
        .layer(CatchPanicLayer::custom(panic_responder))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    headers::apply_security_headers(router, &config.security)
}

/// Catch-all handler: answer from the mock table.
pub async fn mock_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);
    let path = uri.path();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Resolving mock request"
    );

    let table = state.registry.snapshot();
    match resolve(method.as_str(), path, &table, state.picker.as_ref()) {
        Ok(resolved) => {
            let status = match StatusCode::from_u16(resolved.status_code) {
                Ok(status) => status,
                Err(_) => {
                    tracing::error!(
                        request_id = %request_id,
                        route = %resolved.route,
                        status_code = resolved.status_code,
                        "Stored response has an invalid status code"
                    );
                    metrics::record_request(method.as_str(), 500, "invalid_status", start);
                    return ApiError::Internal {
                        public: "Stored mock response has an invalid status code",
                        detail: resolved.route,
                    }
                    .into_response();
                }
            };

            tracing::debug!(
                request_id = %request_id,
                route = %resolved.route,
                status = status.as_u16(),
                "Mock response served"
            );
            metrics::record_request(method.as_str(), status.as_u16(), "served", start);
            (status, Json(resolved.body)).into_response()
        }
        Err(ResolveError::RouteNotFound) => {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, "No mock route matched");
            metrics::record_request(method.as_str(), 404, "route_not_found", start);
            ApiError::not_found("Mock route not found").into_response()
        }
        Err(ResolveError::NoEligibleResponse(_)) => {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, "No eligible mock response");
            metrics::record_request(method.as_str(), 404, "no_eligible_response", start);
            ApiError::not_found("No matching response found for the given parameters")
                .into_response()
        }
    }
}
