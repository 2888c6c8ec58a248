//! Per-request deadlines for service calls.

use serde_json::json;
use std::future::Future;
use std::time::Duration;

use crate::error::AppError;

/// Runs `fut` under a deadline.
///
/// When the deadline elapses the future is dropped, which cancels any storage
/// call still in flight, and [`AppError::Timeout`] is returned.
pub async fn with_deadline<T, F>(timeout: Duration, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    tokio::time::timeout(timeout, fut).await.map_err(|_| {
        AppError::timeout(
            "Request deadline exceeded",
            json!({ "timeout_ms": timeout.as_millis() as u64 }),
        )
    })?
}
