//! DTOs for the short URL creation endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{IdempotencyKey, ShortUrlId};

/// Request to create a short URL.
///
/// `id` and `idempotency_key` may be supplied by the client. When absent the
/// server generates them. Supplied values must not be empty. A client that
/// wants safe retries must send its own `idempotency_key` and reuse it on
/// every attempt.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateShortUrlRequest {
    pub id: Option<ShortUrlId>,

    pub idempotency_key: Option<IdempotencyKey>,

    /// Caller-chosen short name, validated separately.
    pub name: String,

    /// Destination URL. Stored as-is.
    #[validate(length(min = 1, max = 8192, message = "Link must be 1 to 8192 characters"))]
    pub link: String,
}

/// Result of a successful (or replayed) creation.
#[derive(Debug, Serialize)]
pub struct CreateShortUrlResponse {
    /// Name from the request being answered.
    pub name: String,
    /// Link of the stored record.
    pub link: String,
}
