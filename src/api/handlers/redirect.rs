//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::deadline::with_deadline;

/// Redirects a short name to its link.
///
/// # Endpoint
///
/// `GET /{name}`
///
/// # Response
///
/// `303 See Other` with the stored link in the `Location` header. Other
/// methods on this path are answered with 405 by the router.
///
/// # Errors
///
/// Returns 404 Not Found if no non-expired record owns the name.
/// Returns 504 Gateway Timeout if the request deadline elapses.
pub async fn redirect_handler(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let link = with_deadline(
        state.request_timeout,
        state.short_url_service.select(&name),
    )
    .await?;

    debug!("Resolved {} -> {}", name, link);

    let location = HeaderValue::from_str(&link).map_err(|_| {
        AppError::storage(
            "Stored link is not a valid Location header",
            json!({ "name": name }),
        )
    })?;

    Ok((StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response())
}
