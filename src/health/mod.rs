//! Liveness endpoint.

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::admin::or_mock;
use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    /// Seconds since the server state was created.
    pub uptime: f64,
    /// Current time, epoch milliseconds.
    pub timestamp: i64,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        uptime: state.started_at.elapsed().as_secs_f64(),
        timestamp: Utc::now().timestamp_millis(),
    })
}

pub fn setup_system_router() -> Router<AppState> {
    Router::new()
        .route("/health", or_mock(get(health)))
        .route("/system/health", or_mock(get(health)))
}
