use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// JSON request body that never short-circuits with axum's plain-text rejections.
///
/// A missing body, an empty body, or a body sent with a non-JSON content type
/// reads as `{}`; handlers then apply their own field validation. Only a JSON
/// body that fails to parse is rejected, as a 400 `ApiError`.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_json_content_type);

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!("Unreadable request body: {}", rejection.body_text());
            ApiError::bad_request("Unable to read request body")
        })?;

        if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(Value::Object(Map::new())));
        }

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|err| ApiError::bad_request(format!("Malformed JSON body: {}", err)))
    }
}

fn is_json_content_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case("application/json")
        || essence.to_ascii_lowercase().ends_with("+json")
}
