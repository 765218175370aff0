use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - service overview
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "todo-api",
        "version": version,
        "auth_header": crate::middleware::AUTH_HEADER,
        "endpoints": {
            "users": "POST /users, POST /users/login (public)",
            "session": "GET /users/me, DELETE /users/me/token",
            "todos": "POST /todos, GET /todos",
            "todo": "GET|PATCH|DELETE /todos/:id, GET /todos/remove/:id, GET /todos/complete/:id",
            "health": "/health (public)",
        }
    }))
}

/// GET /health - liveness plus store reachability
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.store.backend_name();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": backend
            })),
        ),
        Err(e) => {
            tracing::error!("Store health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "store": backend
                })),
            )
        }
    }
}
