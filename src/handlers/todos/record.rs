use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use serde::Serialize;

use crate::app::AppState;
use crate::database::models::{Todo, TodoChanges, TodoPatch};
use crate::error::ApiError;
use crate::handlers::body::JsonBody;
use crate::middleware::AuthUser;

use super::{now_ms, parse_id};

#[derive(Debug, Serialize)]
pub struct TodoEnvelope {
    pub todo: Todo,
}

fn not_found() -> ApiError {
    ApiError::not_found("Todo not found")
}

/// GET /todos/:id - fetch one owned to-do
///
/// A malformed id is a 400 here, unlike the mutating routes.
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<TodoEnvelope>, ApiError> {
    let id = parse_id(&id).ok_or_else(|| ApiError::bad_request("invalid ID"))?;

    let todo = state
        .store
        .find_owned(id, auth.user.id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(TodoEnvelope { todo }))
}

/// DELETE /todos/:id and GET /todos/remove/:id - delete one owned to-do
///
/// Responds with the removed item.
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id).ok_or_else(not_found)?;

    let todo = state
        .store
        .delete_owned(id, auth.user.id)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!("User {} deleted todo {}", auth.user.id, todo.id);
    Ok(Json(todo))
}

/// GET /todos/complete/:id - mark an owned to-do completed now
pub async fn complete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<TodoEnvelope>, ApiError> {
    let id = parse_id(&id).ok_or_else(not_found)?;

    let todo = state
        .store
        .update_owned(id, auth.user.id, TodoChanges::complete(now_ms()))
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(TodoEnvelope { todo }))
}

/// PATCH /todos/:id - update `text` and/or `completed`
///
/// `completedAt` is derived: stamped when `completed` is `true`, cleared
/// (with `completed` forced to `false`) in every other case.
pub async fn patch(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Json<TodoEnvelope>, ApiError> {
    let id = parse_id(&id).ok_or_else(not_found)?;
    let changes = TodoPatch::pick(&body)?.into_changes(now_ms());

    let todo = state
        .store
        .update_owned(id, auth.user.id, changes)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(TodoEnvelope { todo }))
}
