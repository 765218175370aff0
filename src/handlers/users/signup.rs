use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use std::collections::HashMap;

use crate::app::AppState;
use crate::database::models::{user::is_valid_email, NewUser};
use crate::error::ApiError;
use crate::handlers::body::JsonBody;
use crate::middleware::AUTH_HEADER;

use super::{hash_password, issue_session, Credentials};

/// POST /users - create an account and open its first session
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let Credentials { email, password } = Credentials::pick(&body);
    let min_length = state.config.security.password_min_length;

    let mut field_errors = HashMap::new();
    let email = email.unwrap_or_default();
    if !is_valid_email(&email) {
        field_errors.insert("email".to_string(), format!("{} is not a valid email", email));
    }
    let password = password.unwrap_or_default();
    if password.chars().count() < min_length {
        field_errors.insert(
            "password".to_string(),
            format!("Password must be at least {} characters", min_length),
        );
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error("Validation failed", Some(field_errors)));
    }

    let password_hash = hash_password(password).await?;
    let user = state
        .store
        .insert_user(NewUser {
            email,
            password_hash,
        })
        .await?;
    let token = issue_session(&state, user.id).await?;

    tracing::info!("Created user {}", user.id);
    Ok(([(AUTH_HEADER, token)], Json(user)))
}
