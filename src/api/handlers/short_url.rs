//! Handler for short URL creation endpoint.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::short_url::{CreateShortUrlRequest, CreateShortUrlResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::deadline::with_deadline;
use crate::utils::id_generator::{new_id, new_idempotency_key};
use crate::utils::name_validator::validate_name;

/// Creates a short URL, or replays an earlier creation.
///
/// # Endpoint
///
/// `POST /api/url`
///
/// # Request Body
///
/// ```json
/// {
///   "id": "0190b1c2-7d3e-7f00-8a1b-2c3d4e5f6a7b",              // optional
///   "idempotency_key": "0190b1c2-7d3e-7f00-9c1b-2c3d4e5f6a7c", // optional
///   "name": "promo",
///   "link": "https://a.example"
/// }
/// ```
///
/// # Response
///
/// `201 Created` for both a new mapping and a replay of the same
/// idempotency key:
///
/// ```json
/// { "name": "promo", "link": "https://a.example" }
/// ```
///
/// `name` echoes the name in this request. On a replay `link` is the one
/// stored by the first request, which may have been made under another name.
///
/// # Errors
///
/// - 400 if the content type is not `application/json`, the body is empty or
///   malformed, the name/link fails validation, or a supplied `id` or
///   `idempotency_key` is empty
/// - 409 if a non-expired record already owns the name
/// - 504 if the request deadline elapses
/// - 500 on storage or identifier generation failures
pub async fn create_short_url_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateShortUrlResponse>), AppError> {
    require_json_content_type(&headers)?;

    if body.is_empty() {
        return Err(AppError::bad_request("Request body is empty", json!({})));
    }

    let payload: CreateShortUrlRequest = serde_json::from_slice(&body).map_err(|e| {
        AppError::bad_request("Invalid JSON body", json!({ "reason": e.to_string() }))
    })?;

    payload.validate()?;
    validate_name(&payload.name)?;

    if payload.id.as_ref().is_some_and(|id| id.as_str().is_empty()) {
        return Err(AppError::bad_request("id must not be empty", json!({ "field": "id" })));
    }
    if payload
        .idempotency_key
        .as_ref()
        .is_some_and(|key| key.as_str().is_empty())
    {
        return Err(AppError::bad_request(
            "idempotency_key must not be empty",
            json!({ "field": "idempotency_key" }),
        ));
    }

    if HeaderValue::from_str(&payload.link).is_err() {
        return Err(AppError::bad_request(
            "Link contains characters that cannot be used in a redirect",
            json!({}),
        ));
    }

    let id = match payload.id {
        Some(id) => id,
        None => new_id()?,
    };
    let idempotency_key = match payload.idempotency_key {
        Some(key) => key,
        None => new_idempotency_key()?,
    };

    let link = with_deadline(
        state.request_timeout,
        state
            .short_url_service
            .create(&id, &idempotency_key, &payload.name, &payload.link),
    )
    .await?;

    tracing::debug!(name = %payload.name, %idempotency_key, "short URL created");

    Ok((
        StatusCode::CREATED,
        Json(CreateShortUrlResponse {
            name: payload.name,
            link,
        }),
    ))
}

fn require_json_content_type(headers: &HeaderMap) -> Result<(), AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let essence = content_type.split(';').next().unwrap_or_default().trim();

    if essence.eq_ignore_ascii_case("application/json") {
        Ok(())
    } else {
        Err(AppError::bad_request(
            "Content-Type must be application/json",
            json!({ "content_type": content_type }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(content_type).unwrap(),
        );
        headers
    }

    #[test]
    fn test_json_content_type_accepted() {
        assert!(require_json_content_type(&headers_with("application/json")).is_ok());
        assert!(
            require_json_content_type(&headers_with("application/json; charset=utf-8")).is_ok()
        );
        assert!(require_json_content_type(&headers_with("Application/JSON")).is_ok());
    }

    #[test]
    fn test_other_content_types_rejected() {
        assert!(require_json_content_type(&headers_with("text/plain")).is_err());
        assert!(require_json_content_type(&headers_with("application/jsonx")).is_err());
        assert!(require_json_content_type(&HeaderMap::new()).is_err());
    }
}
