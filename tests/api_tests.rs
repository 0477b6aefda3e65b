//! API integration tests
//!
//! Drive the full router over the in-memory store.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use assetrack::{api::create_router, config::AppConfig, repository::Repository, AppState};

fn app() -> Router {
    let mut config = AppConfig::default();
    config.database.url = "memory://".to_string();
    config.auth.jwt_secret = "integration-secret".to_string();
    create_router(AppState::new(config, Repository::in_memory()))
}

/// Send a request and return the status with the parsed JSON body
async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Register a user and return (id, token)
async fn register(app: &Router, name: &str, email: &str, password: &str) -> (i64, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": name, "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    (
        body["id"].as_i64().unwrap(),
        body["token"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_health_check() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_register_and_login() {
    let app = app();
    register(&app, "Alice", "a@x.com", "pw1").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "AuthError");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "pw1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Alice");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let app = app();
    register(&app, "Alice", "a@x.com", "pw1").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": "Alice 2", "email": "a@x.com", "password": "pw2" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ConflictError");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = app();

    let (status, _) = send(&app, Method::GET, "/api/assets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/assets", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_round_trip() {
    let app = app();
    let (id, token) = register(&app, "Alice", "a@x.com", "pw1").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/auth/profile",
        Some(token.as_str()),
        Some(json!({ "university": "Example University", "address": "1 Main St" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["university"], "Example University");
    assert!(body["token"].is_string());

    let (status, body) = send(&app, Method::GET, "/api/auth/profile", Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], "1 Main St");

    let (status, body) = send(&app, Method::GET, "/api/auth/all", Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert!(body[0].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_assign_and_return_scenario() {
    let app = app();
    let (user_id, token) = register(&app, "Alice", "a@x.com", "pw1").await;

    let (status, asset) = send(
        &app,
        Method::POST,
        "/api/assets",
        Some(token.as_str()),
        Some(json!({ "name": "Laptop 1", "type": "Laptop", "serialNumber": "SN1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", asset);
    assert_eq!(asset["status"], "Available");
    assert_eq!(asset["location"], "Storage");
    let asset_id = asset["id"].as_i64().unwrap();

    let (status, assignment) = send(
        &app,
        Method::POST,
        "/api/assignments",
        Some(token.as_str()),
        Some(json!({ "asset": asset_id, "assignedTo": user_id, "status": "Assigned" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", assignment);
    let assignment_id = assignment["id"].as_i64().unwrap();

    let (_, asset) = send(&app, Method::GET, &format!("/api/assets/{}", asset_id), Some(token.as_str()), None).await;
    assert_eq!(asset["status"], "In Use");
    assert_eq!(asset["assignedTo"], user_id);
    assert_eq!(asset["assignee"]["name"], "Alice");

    // A second active assignment for the same asset is refused
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/assignments",
        Some(token.as_str()),
        Some(json!({ "asset": asset_id, "assignedTo": user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ConflictError");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/assignments/{}", assignment_id),
        Some(token.as_str()),
        Some(json!({ "status": "Returned", "returnDate": "2026-10-19" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, asset) = send(&app, Method::GET, &format!("/api/assets/{}", asset_id), Some(token.as_str()), None).await;
    assert_eq!(asset["status"], "Available");
    assert!(asset["assignedTo"].is_null());

    let (_, details) = send(
        &app,
        Method::GET,
        &format!("/api/assignments/{}", assignment_id),
        Some(token.as_str()),
        None,
    )
    .await;
    assert_eq!(details["assetInfo"]["serialNumber"], "SN1");
    assert_eq!(details["returnDate"], "2026-10-19");
}

#[tokio::test]
async fn test_disposal_and_delete_responses() {
    let app = app();
    let (_, token) = register(&app, "Alice", "a@x.com", "pw1").await;

    let (_, asset) = send(
        &app,
        Method::POST,
        "/api/assets",
        Some(token.as_str()),
        Some(json!({ "name": "Old monitor", "type": "Monitor", "serialNumber": "MON-7" })),
    )
    .await;
    let asset_id = asset["id"].as_i64().unwrap();

    let (status, disposal) = send(
        &app,
        Method::POST,
        "/api/disposals",
        Some(token.as_str()),
        Some(json!({ "asset": asset_id, "method": "Recycled", "reason": "Broken panel" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", disposal);

    let (_, asset) = send(&app, Method::GET, &format!("/api/assets/{}", asset_id), Some(token.as_str()), None).await;
    assert_eq!(asset["status"], "Disposed");

    let disposal_id = disposal["id"].as_i64().unwrap();
    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/disposals/{}", disposal_id),
        Some(token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], disposal_id);
    assert_eq!(body["message"], "Disposal record removed successfully");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/disposals/{}", disposal_id),
        Some(token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFoundError");
}

#[tokio::test]
async fn test_invalid_bodies_are_validation_errors() {
    let app = app();
    let (_, token) = register(&app, "Alice", "a@x.com", "pw1").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/assets",
        Some(token.as_str()),
        Some(json!({ "name": "No serial", "type": "Laptop" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/maintenance",
        Some(token.as_str()),
        Some(json!({ "asset": 1, "type": "Polishing", "description": "Shine" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");
}

#[tokio::test]
async fn test_malformed_path_id_is_validation_error() {
    let app = app();
    let (_, token) = register(&app, "Alice", "a@x.com", "pw1").await;

    let (status, body) = send(&app, Method::GET, "/api/assets/abc", Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");
    assert!(body["message"].is_string());

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/api/maintenance/not-a-number",
        Some(token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");
}
