//! Management API and catch-all behaviour, driven in-process.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

use mock_server::config::MockServerConfig;
use mock_server::storage::MemoryStore;

mod common;
use common::{request, send, test_router, FixedPicker};

async fn register(router: &axum::Router, body: Value) -> String {
    let (status, json) = send(router, "POST", "/mock/register", Some(body)).await;
    assert_eq!(status, StatusCode::OK, "register failed: {json}");
    json["createdAt"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_conditioned_and_fallback_responses() {
    let (router, _) = test_router();

    register(
        &router,
        json!({
            "path": "/api/users/:userId",
            "method": "GET",
            "response": { "id": ":userId", "name": "John Doe" }
        }),
    )
    .await;
    register(
        &router,
        json!({
            "path": "/api/users/:userId",
            "method": "GET",
            "response": { "id": "123", "role": "admin" },
            "conditions": { "userId": "123" }
        }),
    )
    .await;

    let (status, body) = send(&router, "GET", "/api/users/789", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": "789", "name": "John Doe" }));

    let (status, body) = send(&router, "GET", "/api/users/123", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": "123", "role": "admin" }));
}

#[tokio::test]
async fn test_register_response_shape() {
    let (router, store) = test_router();

    let (status, body) = send(
        &router,
        "POST",
        "/mock-register",
        Some(json!({
            "path": "/orders/:id",
            "method": "post",
            "response": { "ok": true },
            "statusCode": 201,
            "conditions": { "id": 5 }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Mock route response registered successfully");
    // Echoed as sent; the key itself is uppercased.
    assert_eq!(body["route"]["method"], "post");
    assert_eq!(body["route"]["path"], "/orders/:id");
    assert_eq!(body["route"]["statusCode"], 201);
    assert_eq!(body["route"]["conditions"], json!({ "id": 5 }));

    let created_at = body["createdAt"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());

    let saved = store.saved_json().unwrap();
    assert_eq!(saved["POST:/orders/:id"]["responses"][0]["createdAt"], created_at);
    assert_eq!(saved["POST:/orders/:id"]["responses"][0]["statusCode"], 201);

    // Non-string conditions compare against their JSON text.
    let (status, _) = send(&router, "POST", "/orders/5", None).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_register_validation() {
    let (router, store) = test_router();

    let (status, body) = send(
        &router,
        "POST",
        "/mock/register",
        Some(json!({ "method": "GET", "response": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Missing required fields: path, method, and response are required"
    );

    let (status, _) = send(&router, "POST", "/mock/register", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        "POST",
        "/mock/register",
        Some(json!({ "path": "/a", "method": "GE T", "response": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        "POST",
        "/mock/register",
        Some(json!({ "path": "/a", "method": "GET", "response": {}, "statusCode": 99 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(store.saved_json().is_none());
    let (_, routes) = send(&router, "GET", "/mock/routes", None).await;
    assert_eq!(routes, json!([]));
}

#[tokio::test]
async fn test_not_found_messages() {
    let (router, _) = test_router();

    let (status, body) = send(&router, "GET", "/nothing/here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Mock route not found");

    register(
        &router,
        json!({
            "path": "/items/:id",
            "method": "GET",
            "response": { "special": true },
            "conditions": { "id": "1" }
        }),
    )
    .await;

    let (status, body) = send(&router, "GET", "/items/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No matching response found for the given parameters");

    // Method is part of the key.
    let (status, body) = send(&router, "DELETE", "/items/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Mock route not found");
}

#[tokio::test]
async fn test_listing_keeps_registration_order() {
    let (router, _) = test_router();

    for path in ["/b", "/a", "/c"] {
        register(&router, json!({ "path": path, "method": "GET", "response": {} })).await;
    }
    register(&router, json!({ "path": "/a", "method": "GET", "response": { "n": 2 } })).await;

    let (status, routes) = send(&router, "GET", "/mock-routes", None).await;
    assert_eq!(status, StatusCode::OK);
    let keys: Vec<_> = routes
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["route"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(keys, ["GET:/b", "GET:/a", "GET:/c"]);
    assert_eq!(routes[1]["responses"].as_array().unwrap().len(), 2);
    assert_eq!(routes[1]["responses"][1]["response"], json!({ "n": 2 }));
}

#[tokio::test]
async fn test_delete_response() {
    let (router, store) = test_router();

    let first = register(&router, json!({ "path": "/x", "method": "GET", "response": { "n": 1 } })).await;
    let second = register(&router, json!({ "path": "/x", "method": "GET", "response": { "n": 2 } })).await;
    assert!(second > first);

    let target = json!({ "path": "/x", "method": "get" });

    let (status, body) = send(&router, "DELETE", "/mock/routes/nope", Some(target.clone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Response not found");

    let (status, body) = send(&router, "DELETE", &format!("/mock/routes/{first}"), Some(target.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Mock route response deleted successfully");

    let (_, body) = send(&router, "GET", "/x", None).await;
    assert_eq!(body, json!({ "n": 2 }));

    let (status, _) = send(&router, "DELETE", &format!("/mock-routes/{second}"), Some(target.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.saved_json().unwrap(), json!({}));

    let (status, body) = send(&router, "DELETE", &format!("/mock/routes/{second}"), Some(target)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");

    let (status, body) = send(&router, "DELETE", "/mock/routes/abc", Some(json!({ "path": "/x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: path and method are required");
}

#[tokio::test]
async fn test_flush() {
    let (router, store) = test_router();
    register(&router, json!({ "path": "/a", "method": "GET", "response": {} })).await;
    register(&router, json!({ "path": "/b", "method": "PUT", "response": {} })).await;

    let (status, body) = send(&router, "DELETE", "/mock/flush", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "All mock routes flushed successfully");
    assert_eq!(body["routeCount"], 0);

    let (_, routes) = send(&router, "GET", "/mock/routes", None).await;
    assert_eq!(routes, json!([]));
    assert_eq!(store.saved_json().unwrap(), json!({}));
}

#[tokio::test]
async fn test_failed_save_is_reported_and_rolled_back() {
    let (router, store) = test_router();
    store.set_fail_saves(true);

    let (status, body) = send(
        &router,
        "POST",
        "/mock/register",
        Some(json!({ "path": "/a", "method": "GET", "response": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to save mock route");

    let (status, _) = send(&router, "GET", "/a", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_failed_delete_save_keeps_response() {
    let (router, store) = test_router();
    let id = register(&router, json!({ "path": "/a", "method": "GET", "response": { "n": 1 } })).await;

    store.set_fail_saves(true);
    let (status, body) = send(
        &router,
        "DELETE",
        &format!("/mock/routes/{id}"),
        Some(json!({ "path": "/a", "method": "GET" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to save routes after deletion");

    let (status, body) = send(&router, "GET", "/a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "n": 1 }));
}

#[tokio::test]
async fn test_failed_flush_save_keeps_routes() {
    let (router, store) = test_router();
    register(&router, json!({ "path": "/a", "method": "GET", "response": { "n": 1 } })).await;

    store.set_fail_saves(true);
    let (status, body) = send(&router, "DELETE", "/mock/flush", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to flush mock routes");

    let (status, body) = send(&router, "GET", "/a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "n": 1 }));
    let (_, routes) = send(&router, "GET", "/mock/routes", None).await;
    assert_eq!(routes.as_array().unwrap().len(), 1);
}

fn large_registration(bytes: usize) -> Value {
    json!({ "path": "/big", "method": "GET", "response": { "blob": "x".repeat(bytes) } })
}

#[tokio::test]
async fn test_raised_body_limit_is_honoured() {
    let mut config = MockServerConfig::default();
    config.security.max_body_size = 8 * 1024 * 1024;
    let router = common::router_with(config, Arc::new(MemoryStore::new()), FixedPicker(0));

    let (status, body) = send(&router, "POST", "/mock/register", Some(large_registration(3 * 1024 * 1024))).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = send(&router, "GET", "/big", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["blob"].as_str().unwrap().len(), 3 * 1024 * 1024);
}

#[tokio::test]
async fn test_oversized_body_is_json_413() {
    let (router, store) = test_router();

    let (status, body) = send(&router, "POST", "/mock/register", Some(large_registration(3 * 1024 * 1024))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], "Request body exceeds the configured size limit");

    // Same outcome when the client announces the length up front.
    let payload = large_registration(3 * 1024 * 1024).to_string();
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/mock-register")
        .header("content-type", "application/json")
        .header("content-length", payload.len())
        .body(axum::body::Body::from(payload))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Request body exceeds the configured size limit");

    assert!(store.saved_json().is_none());
}

#[tokio::test]
async fn test_debug_routes() {
    let (router, _) = test_router();
    register(
        &router,
        json!({
            "path": "/users/:id",
            "method": "GET",
            "response": { "secret": "hidden" },
            "statusCode": 202,
            "description": "accepted",
            "conditions": { "id": "1" }
        }),
    )
    .await;

    for uri in ["/debug/routes", "/system/debug/routes"] {
        let (status, body) = send(&router, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["server"]["routeCount"], 11);
        assert_eq!(body["mock"]["routeCount"], 1);

        let mock = &body["mock"]["routes"][0];
        assert_eq!(mock["route"], "GET:/users/:id");
        assert_eq!(mock["pattern"], "/users/:id");
        assert_eq!(mock["method"], "GET");
        assert_eq!(
            mock["responses"][0],
            json!({ "statusCode": 202, "conditions": { "id": "1" }, "description": "accepted" })
        );
    }
}

#[tokio::test]
async fn test_health() {
    let (router, _) = test_router();
    for uri in ["/health", "/system/health"] {
        let (status, body) = send(&router, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["uptime"].as_f64().unwrap() >= 0.0);
        assert!(body["timestamp"].as_i64().unwrap() > 0);
    }
}

#[tokio::test]
async fn test_unserved_methods_reach_mocks() {
    let (router, _) = test_router();

    let (status, body) = send(&router, "PUT", "/health", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Mock route not found");

    register(&router, json!({ "path": "/health", "method": "PUT", "response": { "mocked": true } })).await;
    let (status, body) = send(&router, "PUT", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "mocked": true }));

    register(&router, json!({ "path": "/mock/flush", "method": "GET", "response": { "also": "mocked" } })).await;
    let (_, body) = send(&router, "GET", "/mock/flush", None).await;
    assert_eq!(body, json!({ "also": "mocked" }));
}

#[tokio::test]
async fn test_security_and_request_id_headers() {
    let (router, _) = test_router();

    let response = router
        .clone()
        .oneshot(request("GET", "/not/registered", None))
        .await
        .unwrap();
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-xss-protection"], "1; mode=block");
    assert!(headers.contains_key("x-request-id"));

    let mut config = MockServerConfig::default();
    config.security.enable_headers = false;
    let router = common::router_with(config, Arc::new(MemoryStore::new()), FixedPicker(0));
    let response = router.oneshot(request("GET", "/health", None)).await.unwrap();
    assert!(!response.headers().contains_key("x-frame-options"));
}

#[tokio::test]
async fn test_picker_chooses_among_unconditioned() {
    let store = Arc::new(MemoryStore::new());
    let router = common::router_with(MockServerConfig::default(), store, FixedPicker(1));

    for n in 0..3 {
        register(&router, json!({ "path": "/r", "method": "GET", "response": { "n": n } })).await;
    }
    let (_, body) = send(&router, "GET", "/r", None).await;
    assert_eq!(body, json!({ "n": 1 }));
}
