use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
};

use crate::app::AppState;
use crate::auth::token_digest;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /users/me - the caller's profile
pub async fn me(Extension(auth): Extension<AuthUser>) -> Json<User> {
    Json(auth.user)
}

/// DELETE /users/me/token - revoke the token this request was made with
///
/// Other sessions of the same user stay open.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .pull_token(auth.user.id, &token_digest(&auth.token))
        .await?;

    tracing::info!("User {} closed a session", auth.user.id);
    Ok(StatusCode::OK)
}
