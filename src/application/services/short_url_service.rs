//! Short URL creation and resolution service.

use std::sync::Arc;

use crate::domain::entities::{IdempotencyKey, ShortUrlId};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;
use serde_json::json;

/// Service deciding whether a creation request is new, a replay or a conflict.
///
/// The service holds no state of its own. Identifiers and idempotency keys are
/// produced by the caller, so given its inputs the outcome depends only on
/// repository contents.
pub struct ShortUrlService<R: ShortUrlRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ShortUrlRepository + ?Sized> ShortUrlService<R> {
    /// Creates a new short URL service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Creates the mapping `name -> link`, or replays an earlier creation.
    ///
    /// # Replays
    ///
    /// If a non-expired record was already created with `idempotency_key`, its
    /// stored link is returned and nothing is inserted. The name rule is not
    /// evaluated for a replay.
    ///
    /// # Concurrency
    ///
    /// The name lookup is only a fast pre-check. Two creates racing for the
    /// same name can both pass it; the repository's uniqueness guarantee then
    /// rejects the loser with [`AppError::NameConflict`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NameConflict`] if a non-expired record owns `name`.
    /// Any other repository error is returned unchanged.
    pub async fn create(
        &self,
        id: &ShortUrlId,
        idempotency_key: &IdempotencyKey,
        name: &str,
        link: &str,
    ) -> Result<String, AppError> {
        if let Some(previous) = self
            .repository
            .select_by_idempotency_key(idempotency_key)
            .await?
        {
            tracing::debug!(%idempotency_key, "replaying short URL creation");
            return Ok(previous);
        }

        if self.repository.select_by_name(name).await?.is_some() {
            return Err(AppError::name_conflict(
                "Name is already taken",
                json!({ "name": name }),
            ));
        }

        self.repository
            .insert(id, name, link, idempotency_key)
            .await?;

        Ok(link.to_string())
    }

    /// Resolves `name` to its link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no non-expired record owns `name`, or
    /// if the stored link is empty.
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn select(&self, name: &str) -> Result<String, AppError> {
        self.repository
            .select_by_name(name)
            .await?
            .filter(|link| !link.is_empty())
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "name": name })))
    }

    /// Checks that the underlying storage answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockShortUrlRepository;

    fn id(value: &str) -> ShortUrlId {
        ShortUrlId::new(value)
    }

    fn key(value: &str) -> IdempotencyKey {
        IdempotencyKey::new(value)
    }

    #[tokio::test]
    async fn test_create_new_name_inserts_and_returns_link() {
        let mut mock_repo = MockShortUrlRepository::new();

        mock_repo
            .expect_select_by_idempotency_key()
            .times(1)
            .returning(|_| Ok(None));

        mock_repo
            .expect_select_by_name()
            .withf(|name| name == "promo")
            .times(1)
            .returning(|_| Ok(None));

        mock_repo
            .expect_insert()
            .withf(|id, name, link, key| {
                id.as_str() == "id-1"
                    && name == "promo"
                    && link == "https://a.example"
                    && key.as_str() == "key-1"
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let service = ShortUrlService::new(Arc::new(mock_repo));

        let result = service
            .create(&id("id-1"), &key("key-1"), "promo", "https://a.example")
            .await;

        assert_eq!(result.unwrap(), "https://a.example");
    }

    #[tokio::test]
    async fn test_create_replay_returns_stored_link_without_insert() {
        let mut mock_repo = MockShortUrlRepository::new();

        mock_repo
            .expect_select_by_idempotency_key()
            .withf(|key| key.as_str() == "key-1")
            .times(1)
            .returning(|_| Ok(Some("https://a.example".to_string())));

        mock_repo.expect_select_by_name().times(0);
        mock_repo.expect_insert().times(0);

        let service = ShortUrlService::new(Arc::new(mock_repo));

        // A replay ignores the submitted link and answers with the stored one.
        let result = service
            .create(&id("id-2"), &key("key-1"), "promo", "https://other.example")
            .await;

        assert_eq!(result.unwrap(), "https://a.example");
    }

    #[tokio::test]
    async fn test_create_taken_name_is_conflict() {
        let mut mock_repo = MockShortUrlRepository::new();

        mock_repo
            .expect_select_by_idempotency_key()
            .times(1)
            .returning(|_| Ok(None));

        mock_repo
            .expect_select_by_name()
            .times(1)
            .returning(|_| Ok(Some("https://a.example".to_string())));

        mock_repo.expect_insert().times(0);

        let service = ShortUrlService::new(Arc::new(mock_repo));

        let result = service
            .create(&id("id-3"), &key("key-2"), "promo", "https://b.example")
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::NameConflict { .. }));
        assert!(!err.to_string().contains("https://a.example"));
    }

    #[tokio::test]
    async fn test_create_insert_conflict_from_storage_is_surfaced() {
        let mut mock_repo = MockShortUrlRepository::new();

        mock_repo
            .expect_select_by_idempotency_key()
            .returning(|_| Ok(None));
        mock_repo.expect_select_by_name().returning(|_| Ok(None));
        mock_repo.expect_insert().times(1).returning(|_, _, _, _| {
            Err(AppError::name_conflict(
                "Name is already taken",
                json!({ "constraint": "shorturls_name_key" }),
            ))
        });

        let service = ShortUrlService::new(Arc::new(mock_repo));

        let result = service
            .create(&id("id-4"), &key("key-4"), "raced", "https://a.example")
            .await;

        assert!(matches!(result, Err(AppError::NameConflict { .. })));
    }

    #[tokio::test]
    async fn test_create_insert_storage_error_is_surfaced() {
        let mut mock_repo = MockShortUrlRepository::new();

        mock_repo
            .expect_select_by_idempotency_key()
            .returning(|_| Ok(None));
        mock_repo.expect_select_by_name().returning(|_| Ok(None));
        mock_repo
            .expect_insert()
            .returning(|_, _, _, _| Err(AppError::storage("Database error", json!({}))));

        let service = ShortUrlService::new(Arc::new(mock_repo));

        let result = service
            .create(&id("id-5"), &key("key-5"), "promo", "https://a.example")
            .await;

        assert!(matches!(result, Err(AppError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_create_key_lookup_error_aborts() {
        let mut mock_repo = MockShortUrlRepository::new();

        mock_repo
            .expect_select_by_idempotency_key()
            .times(1)
            .returning(|_| Err(AppError::storage("connection reset", json!({}))));
        mock_repo.expect_select_by_name().times(0);
        mock_repo.expect_insert().times(0);

        let service = ShortUrlService::new(Arc::new(mock_repo));

        let result = service
            .create(&id("id-6"), &key("key-6"), "promo", "https://a.example")
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Storage { .. }));
        assert_eq!(err.to_string(), "connection reset");
    }

    #[tokio::test]
    async fn test_create_name_lookup_error_aborts() {
        let mut mock_repo = MockShortUrlRepository::new();

        mock_repo
            .expect_select_by_idempotency_key()
            .returning(|_| Ok(None));
        mock_repo
            .expect_select_by_name()
            .times(1)
            .returning(|_| Err(AppError::timeout("deadline", json!({}))));
        mock_repo.expect_insert().times(0);

        let service = ShortUrlService::new(Arc::new(mock_repo));

        let result = service
            .create(&id("id-7"), &key("key-7"), "promo", "https://a.example")
            .await;

        assert!(matches!(result, Err(AppError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_select_returns_link() {
        let mut mock_repo = MockShortUrlRepository::new();

        mock_repo
            .expect_select_by_name()
            .withf(|name| name == "promo")
            .times(1)
            .returning(|_| Ok(Some("https://a.example".to_string())));

        let service = ShortUrlService::new(Arc::new(mock_repo));

        assert_eq!(service.select("promo").await.unwrap(), "https://a.example");
    }

    #[tokio::test]
    async fn test_select_missing_name_is_not_found() {
        let mut mock_repo = MockShortUrlRepository::new();

        mock_repo.expect_select_by_name().returning(|_| Ok(None));

        let service = ShortUrlService::new(Arc::new(mock_repo));

        match service.select("missing").await {
            Err(AppError::NotFound { details, .. }) => assert_eq!(details["name"], "missing"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_select_empty_link_is_not_found() {
        let mut mock_repo = MockShortUrlRepository::new();

        mock_repo
            .expect_select_by_name()
            .returning(|_| Ok(Some(String::new())));

        let service = ShortUrlService::new(Arc::new(mock_repo));

        assert!(matches!(
            service.select("blank").await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_select_storage_error_is_surfaced() {
        let mut mock_repo = MockShortUrlRepository::new();

        mock_repo
            .expect_select_by_name()
            .returning(|_| Err(AppError::storage("Database error", json!({}))));

        let service = ShortUrlService::new(Arc::new(mock_repo));

        assert!(matches!(
            service.select("promo").await,
            Err(AppError::Storage { .. })
        ));
    }
}
