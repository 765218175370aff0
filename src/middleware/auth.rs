use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{self, ACCESS_AUTH};
use crate::database::models::User;
use crate::error::ApiError;

/// Header carrying the session token, on requests and on signup/login responses
pub const AUTH_HEADER: &str = "x-auth";

/// Authenticated caller, injected into request extensions
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user: User,
    /// The raw token presented with this request, needed to revoke it
    pub token: String,
}

/// Session middleware: the token must verify and still be held by its user
pub async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&headers).map_err(ApiError::unauthorized)?;

    let claims = auth::validate_token(&token, &state.config.security)?;

    let user = state
        .store
        .find_by_token(claims.sub, ACCESS_AUTH, &auth::token_digest(&token))
        .await?
        .ok_or_else(|| {
            tracing::warn!("Session token for user {} is not active", claims.sub);
            ApiError::unauthorized("Session is not active")
        })?;

    tracing::debug!("Authenticated user {}", user.id);

    request.extensions_mut().insert(AuthUser { user, token });

    Ok(next.run(request).await)
}

/// Extract session token from the `x-auth` header
fn extract_token(headers: &HeaderMap) -> Result<String, String> {
    let header = headers
        .get(AUTH_HEADER)
        .ok_or_else(|| format!("Missing {} header", AUTH_HEADER))?;

    let token = header
        .to_str()
        .map_err(|_| format!("Invalid {} header format", AUTH_HEADER))?
        .trim();

    if token.is_empty() {
        return Err("Empty session token".to_string());
    }
    Ok(token.to_string())
}
