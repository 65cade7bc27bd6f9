#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use ratesreg_api::config::ServerConfig;
use ratesreg_api::router::build_app_router;
use ratesreg_api::state::AppState;
use ratesreg_db::Stores;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        currency_codes_path: None,
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// The router is cheap to clone and clones share the same store, so a test
/// can issue several requests against one app.
pub fn build_test_app() -> Router {
    build_test_app_with(Stores::memory())
}

/// Build the full application router over the given stores.
pub fn build_test_app_with(stores: Stores) -> Router {
    let config = test_config();
    let state = AppState::build(stores, config.clone()).expect("valid test configuration");
    build_app_router(state, &config)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str) -> Response {
    send(app, Method::PUT, uri, None).await
}

pub async fn delete(app: &Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// JSON body for a valid employee.
pub fn employee_json(username: &str, email: &str) -> serde_json::Value {
    serde_json::json!({
        "name": "Sakthi",
        "username": username,
        "email": email,
        "age": 27,
    })
}

/// Create an employee and return its id.
pub async fn create_employee(app: &Router, username: &str, email: &str) -> i64 {
    let response = post_json(app, "/api/v1/employees", employee_json(username, email)).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}
