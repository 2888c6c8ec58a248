//! Repository trait for short URL data access.

use crate::domain::entities::{IdempotencyKey, ShortUrlId};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract the shortening service relies on.
///
/// Every lookup ignores expired records. A missing record is `Ok(None)`, never
/// an empty string. Calls are futures: dropping one (for example when a
/// request deadline elapses) abandons the outstanding storage work.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryShortUrlRepository`] - process-local map
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_short_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortUrlRepository: Send + Sync {
    /// Finds the link of the non-expired record owning `name`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn select_by_name(&self, name: &str) -> Result<Option<String>, AppError>;

    /// Finds the link of the non-expired record created with `key`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn select_by_idempotency_key(
        &self,
        key: &IdempotencyKey,
    ) -> Result<Option<String>, AppError>;

    /// Stores a new record.
    ///
    /// An expired record holding the same name is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NameConflict`] if a non-expired record already owns
    /// `name`. This is the authoritative answer when two creates race.
    ///
    /// Returns [`AppError::Storage`] on any other database error.
    async fn insert(
        &self,
        id: &ShortUrlId,
        name: &str,
        link: &str,
        idempotency_key: &IdempotencyKey,
    ) -> Result<(), AppError>;

    /// Checks that the storage backend answers.
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
