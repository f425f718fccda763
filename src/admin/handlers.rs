use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::admin::{ServerRoute, SERVER_ROUTES};
use crate::http::request::parse_json_body;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::registry::Registration;
use crate::routing::CandidateResponse;

const MISSING_REGISTER_FIELDS: &str =
    "Missing required fields: path, method, and response are required";
const MISSING_DELETE_FIELDS: &str = "Missing required fields: path and method are required";

/// Body of a registration request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub path: Option<String>,
    pub method: Option<String>,
    pub response: Option<Value>,
    pub status_code: Option<Value>,
    pub description: Option<String>,
    pub conditions: Option<Value>,
}

impl RegisterRequest {
    fn into_registration(self) -> Result<Registration, ApiError> {
        let (path, method, body) = match (
            non_empty(self.path),
            non_empty(self.method),
            self.response.filter(is_present),
        ) {
            (Some(path), Some(method), Some(body)) => (path, method, body),
            _ => return Err(ApiError::validation(MISSING_REGISTER_FIELDS)),
        };

        let status_code = match self.status_code {
            None | Some(Value::Null) => 200,
            Some(raw) => parse_status_code(&raw)?,
        };

        let conditions = match self.conditions {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => return Err(ApiError::validation("conditions must be an object")),
        };

        Ok(Registration {
            method,
            path,
            body,
            status_code,
            description: self.description.unwrap_or_default(),
            conditions,
        })
    }
}

/// Body of a delete request.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteRequest {
    pub path: Option<String>,
    pub method: Option<String>,
}

#[derive(Serialize)]
pub struct RouteListing {
    pub route: String,
    pub responses: Vec<CandidateResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteGroup<T> {
    pub route_count: usize,
    pub routes: Vec<T>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSummary {
    pub status_code: u16,
    pub conditions: Map<String, Value>,
    pub description: String,
}

#[derive(Serialize)]
pub struct MockRouteSummary {
    pub route: String,
    pub pattern: String,
    pub method: String,
    pub responses: Vec<ResponseSummary>,
}

#[derive(Serialize)]
pub struct DebugRoutes {
    pub server: RouteGroup<ServerRoute>,
    pub mock: RouteGroup<MockRouteSummary>,
}

pub async fn register_mock(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, ApiError> {
    let registration = parse_json_body::<RegisterRequest>(&body?)?.into_registration()?;
    let path = registration.path.clone();
    let method = registration.method.clone();
    let status_code = registration.status_code;
    let conditions = registration.conditions.clone();

    let registered = state
        .registry
        .register(registration)
        .await
        .map_err(|e| ApiError::from_registry(e, "Failed to save mock route"))?;

    Ok(Json(json!({
        "message": "Mock route response registered successfully",
        "route": {
            "path": path,
            "method": method,
            "statusCode": status_code,
            "conditions": conditions,
        },
        "createdAt": registered.created_at,
    })))
}

pub async fn list_mocks(State(state): State<AppState>) -> Json<Vec<RouteListing>> {
    let table = state.registry.snapshot();
    let routes = table
        .entries()
        .map(|entry| RouteListing {
            route: entry.key.to_string(),
            responses: entry.route.responses.clone(),
        })
        .collect();
    Json(routes)
}

pub async fn delete_mock_response(
    State(state): State<AppState>,
    response_id: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(response_id) = response_id?;
    let request: DeleteRequest = parse_json_body(&body?)?;
    let (path, method) = match (non_empty(request.path), non_empty(request.method)) {
        (Some(path), Some(method)) => (path, method),
        _ => return Err(ApiError::validation(MISSING_DELETE_FIELDS)),
    };

    state
        .registry
        .delete_response(&method, &path, &response_id)
        .await
        .map_err(|e| ApiError::from_registry(e, "Failed to save routes after deletion"))?;

    Ok(Json(json!({
        "message": "Mock route response deleted successfully",
    })))
}

pub async fn flush_mocks(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state
        .registry
        .flush()
        .await
        .map_err(|e| ApiError::from_registry(e, "Failed to flush mock routes"))?;

    Ok(Json(json!({
        "message": "All mock routes flushed successfully",
        "routeCount": 0,
    })))
}

pub async fn debug_routes(State(state): State<AppState>) -> Json<DebugRoutes> {
    let table = state.registry.snapshot();
    let mock_routes: Vec<MockRouteSummary> = table
        .entries()
        .map(|entry| MockRouteSummary {
            route: entry.key.to_string(),
            pattern: entry.key.pattern().to_string(),
            method: entry.key.method().to_string(),
            responses: entry
                .route
                .responses
                .iter()
                .map(|r| ResponseSummary {
                    status_code: r.status_code,
                    conditions: r.conditions.clone(),
                    description: r.description.clone(),
                })
                .collect(),
        })
        .collect();

    Json(DebugRoutes {
        server: RouteGroup {
            route_count: SERVER_ROUTES.len(),
            routes: SERVER_ROUTES.to_vec(),
        },
        mock: RouteGroup {
            route_count: mock_routes.len(),
            routes: mock_routes,
        },
    })
}

/// `response` must be present and not a falsy scalar (`false`, `0`, `""`).
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_status_code(raw: &Value) -> Result<u16, ApiError> {
    raw.as_u64()
        .and_then(|n| u16::try_from(n).ok())
        .filter(|n| StatusCode::from_u16(*n).is_ok())
        .ok_or_else(|| ApiError::validation("statusCode must be a valid HTTP status code"))
}
