//! Error responses.
//!
//! # Responsibilities
//! - Map handler failures to status codes
//! - Render every error as JSON with an `error` field
//! - Answer handler panics (hiding details in production)

use std::any::Any;

use axum::body::Body;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::http::{header, Response as HttpResponse, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tower_http::catch_panic::ResponseForPanic;

use crate::lifecycle::Shutdown;
use crate::registry::RegistryError;

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed input; nothing was changed.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// An extractor refused the request (oversized body, bad path).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// Internal failure with a fixed public message.
    #[error("{public}: {detail}")]
    Internal { public: &'static str, detail: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Convert a registry failure; `persist_message` is shown when saving failed.
    pub fn from_registry(err: RegistryError, persist_message: &'static str) -> Self {
        match err {
            RegistryError::Validation(msg) => ApiError::Validation(msg),
            RegistryError::RouteNotFound(_) => ApiError::not_found("Route not found"),
            RegistryError::ResponseNotFound { .. } => ApiError::not_found("Response not found"),
            RegistryError::Persist(e) => ApiError::Internal {
                public: persist_message,
                detail: e.to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Rejected { message: msg, .. } => msg,
            ApiError::Internal { public, detail } => {
                tracing::error!(error = %detail, "{}", public);
                public.to_string()
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        let status = rejection.status();
        let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
            "Request body exceeds the configured size limit".to_string()
        } else {
            rejection.body_text()
        };
        ApiError::Rejected { status, message }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Builds the 500 response for a panicking handler.
#[derive(Clone)]
pub struct PanicResponder {
    expose_errors: bool,
    fail_fast: Option<Shutdown>,
}

impl PanicResponder {
    pub fn new(expose_errors: bool, fail_fast: Option<Shutdown>) -> Self {
        Self {
            expose_errors,
            fail_fast,
        }
    }
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> HttpResponse<Body> {
        let detail = panic_message(err.as_ref());
        tracing::error!(error = %detail, "Unhandled fault while handling request");

        if let Some(shutdown) = &self.fail_fast {
            tracing::error!("Fail-fast enabled, shutting down");
            shutdown.trigger_fault();
        }

        let message = if self.expose_errors {
            detail
        } else {
            "Internal Server Error".to_string()
        };
        let body = serde_json::json!({ "error": message }).to_string();

        let mut response = HttpResponse::new(Body::from(body));
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        response
    }
}

fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
