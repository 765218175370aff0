#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use todo_api::config::AppConfig;
use todo_api::database::MemoryStore;
use todo_api::{app, AppState};

pub const AUTH: &str = "x-auth";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Router over a fresh in-memory store
pub fn test_app() -> Router {
    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;
    app(AppState::new(Arc::new(MemoryStore::new()), config))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTH, token);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    into_test_response(app.clone().oneshot(request).await.unwrap()).await
}

/// Send a body verbatim, with whatever content type the caller chooses
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    content_type: Option<&str>,
    body: &str,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTH, token);
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    into_test_response(app.clone().oneshot(request).await.unwrap()).await
}

async fn into_test_response(response: axum::response::Response) -> TestResponse {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Sign up and return the session token together with the profile
pub async fn signup(app: &Router, email: &str, password: &str) -> (String, Value) {
    let res = send(
        app,
        Method::POST,
        "/users",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK, "signup failed: {}", res.body);
    let token = res
        .headers
        .get(AUTH)
        .expect("signup response carries x-auth")
        .to_str()
        .unwrap()
        .to_string();
    (token, res.body)
}

pub async fn create_todo(app: &Router, token: &str, text: &str) -> Value {
    let res = send(
        app,
        Method::POST,
        "/todos",
        Some(token),
        Some(json!({ "text": text })),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK, "create failed: {}", res.body);
    res.body
}

pub fn id_of(doc: &Value) -> String {
    doc["_id"].as_str().expect("document has _id").to_string()
}
