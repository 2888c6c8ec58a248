#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use serde_json::json;
use shorturl::domain::entities::{IdempotencyKey, ShortUrlId};
use shorturl::domain::repositories::ShortUrlRepository;
use shorturl::error::AppError;
use shorturl::infrastructure::persistence::InMemoryShortUrlRepository;
use shorturl::routes::router;
use shorturl::state::AppState;
use std::sync::Arc;
use std::time::Duration;

pub const TEST_TIMEOUT: Duration = Duration::from_secs(2);

pub fn create_test_state(repository: Arc<dyn ShortUrlRepository>) -> AppState {
    AppState::new(repository, TEST_TIMEOUT)
}

pub fn memory_repository() -> Arc<InMemoryShortUrlRepository> {
    Arc::new(InMemoryShortUrlRepository::new(chrono::Duration::days(1)))
}

pub fn create_test_app(repository: Arc<dyn ShortUrlRepository>) -> Router {
    router(create_test_state(repository))
}

pub fn create_test_server(repository: Arc<dyn ShortUrlRepository>) -> TestServer {
    TestServer::new(create_test_app(repository)).unwrap()
}

pub async fn create_short_url(
    server: &TestServer,
    idempotency_key: &str,
    name: &str,
    link: &str,
) -> axum_test::TestResponse {
    server
        .post("/api/url")
        .json(&json!({
            "idempotency_key": idempotency_key,
            "name": name,
            "link": link
        }))
        .await
}

/// Repository whose every call waits before answering.
pub struct SlowRepository {
    pub inner: InMemoryShortUrlRepository,
    pub delay: Duration,
}

impl SlowRepository {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: InMemoryShortUrlRepository::default(),
            delay,
        }
    }
}

#[async_trait]
impl ShortUrlRepository for SlowRepository {
    async fn select_by_name(&self, name: &str) -> Result<Option<String>, AppError> {
        tokio::time::sleep(self.delay).await;
        self.inner.select_by_name(name).await
    }

    async fn select_by_idempotency_key(
        &self,
        key: &IdempotencyKey,
    ) -> Result<Option<String>, AppError> {
        tokio::time::sleep(self.delay).await;
        self.inner.select_by_idempotency_key(key).await
    }

    async fn insert(
        &self,
        id: &ShortUrlId,
        name: &str,
        link: &str,
        idempotency_key: &IdempotencyKey,
    ) -> Result<(), AppError> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert(id, name, link, idempotency_key).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// Repository that fails every call with a storage error.
pub struct FailingRepository;

fn unavailable() -> AppError {
    AppError::storage("Database error", json!({ "reason": "connection refused" }))
}

#[async_trait]
impl ShortUrlRepository for FailingRepository {
    async fn select_by_name(&self, _name: &str) -> Result<Option<String>, AppError> {
        Err(unavailable())
    }

    async fn select_by_idempotency_key(
        &self,
        _key: &IdempotencyKey,
    ) -> Result<Option<String>, AppError> {
        Err(unavailable())
    }

    async fn insert(
        &self,
        _id: &ShortUrlId,
        _name: &str,
        _link: &str,
        _idempotency_key: &IdempotencyKey,
    ) -> Result<(), AppError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(unavailable())
    }
}
