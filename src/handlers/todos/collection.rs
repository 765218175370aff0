use axum::{
    extract::{Extension, State},
    response::Json,
};
use serde::Serialize;

use crate::app::AppState;
use crate::database::models::{NewTodo, Todo};
use crate::error::ApiError;
use crate::handlers::body::JsonBody;
use crate::middleware::AuthUser;

#[derive(Debug, Serialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
}

/// POST /todos - create a to-do owned by the caller
///
/// Only `text` is read from the body; the item always starts incomplete.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(body): JsonBody,
) -> Result<Json<Todo>, ApiError> {
    let new_todo = NewTodo::pick(&body, auth.user.id)?;
    let todo = state.store.insert_todo(new_todo).await?;

    tracing::info!("User {} created todo {}", auth.user.id, todo.id);
    Ok(Json(todo))
}

/// GET /todos - list the caller's to-dos
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<TodoList>, ApiError> {
    let todos = state.store.list_owned(auth.user.id).await?;
    Ok(Json(TodoList { todos }))
}
