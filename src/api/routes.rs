//! API route configuration.

use crate::api::handlers::create_short_url_handler;
use crate::state::AppState;
use axum::{Router, routing::post};

/// Short URL management routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /url` - Create a short URL (idempotent per `idempotency_key`)
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/url", post(create_short_url_handler))
}
