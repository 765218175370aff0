use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::body::JsonBody;
use crate::middleware::AUTH_HEADER;

use super::{issue_session, verify_password, Credentials};

fn rejected() -> ApiError {
    ApiError::bad_request("Invalid email or password")
}

/// POST /users/login - verify credentials and open a new session
///
/// Unknown email and wrong password produce the same 400.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let Credentials { email, password } = Credentials::pick(&body);
    let (Some(email), Some(password)) = (email, password) else {
        return Err(rejected());
    };

    let Some(user) = state.store.find_by_email(&email).await? else {
        tracing::debug!("Login for unknown email");
        return Err(rejected());
    };

    if !verify_password(password, user.password_hash.clone()).await? {
        tracing::warn!("Failed login for user {}", user.id);
        return Err(rejected());
    }

    let token = issue_session(&state, user.id).await?;
    Ok(([(AUTH_HEADER, token)], Json(user)))
}
