// handlers/users - account and session routes
//
// Signup and login are public; both answer with the user profile and hand the
// new session token back in the `x-auth` header.

use serde_json::Value;
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::{self, ACCESS_AUTH};
use crate::error::ApiError;

pub mod login;
pub mod session;
pub mod signup;

pub use login::login as users_login;
pub use session::{logout as users_logout, me as users_me};
pub use signup::signup as users_signup;

/// `email` and `password` picked from a body; other fields are ignored
#[derive(Debug, Default)]
pub(crate) struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn pick(body: &Value) -> Self {
        Self {
            email: body
                .get("email")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string()),
            password: body
                .get("password")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

/// Generate a token for the user and record its digest on the user document
pub(crate) async fn issue_session(state: &AppState, user_id: Uuid) -> Result<String, ApiError> {
    let token = auth::generate_token(user_id, ACCESS_AUTH, &state.config.security)?;
    state
        .store
        .push_token(user_id, ACCESS_AUTH, &auth::token_digest(&token))
        .await?;
    Ok(token)
}

// Argon2 is CPU bound; keep it off the async workers.
pub(crate) async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || auth::hash_password(&password))
        .await
        .map_err(|e| {
            tracing::error!("Password hashing task failed: {}", e);
            ApiError::internal_server_error("Unable to process password")
        })?
        .map_err(ApiError::from)
}

pub(crate) async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || auth::verify_password(&password, &hash))
        .await
        .map_err(|e| {
            tracing::error!("Password verification task failed: {}", e);
            ApiError::internal_server_error("Unable to process password")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn credentials_pick_trims_email_only() {
        let creds = Credentials::pick(&json!({
            "email": "  ann@example.com ",
            "password": " spaced ",
            "tokens": ["forged"]
        }));
        assert_eq!(creds.email.as_deref(), Some("ann@example.com"));
        assert_eq!(creds.password.as_deref(), Some(" spaced "));
    }

    #[test]
    fn credentials_pick_ignores_non_strings() {
        let creds = Credentials::pick(&json!({ "email": 1, "password": false }));
        assert!(creds.email.is_none());
        assert!(creds.password.is_none());
    }
}
