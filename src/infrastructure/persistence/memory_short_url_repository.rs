//! In-process implementation of the short URL repository.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{IdempotencyKey, ShortUrl, ShortUrlId};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;

/// Repository backed by a mutex-guarded map keyed by name.
///
/// Honours the same contract as the PostgreSQL repository: expired records
/// are invisible to lookups and are replaced by the next insert for their
/// name. The check-and-insert happens under one lock, so concurrent creates
/// for a name produce exactly one winner.
pub struct InMemoryShortUrlRepository {
    records: Mutex<HashMap<String, ShortUrl>>,
    ttl: Duration,
}

impl InMemoryShortUrlRepository {
    /// Creates an empty repository; inserted records live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of stored records, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, ShortUrl>>, AppError> {
        self.records
            .lock()
            .map_err(|_| AppError::storage("In-memory store is poisoned", json!({})))
    }
}

impl Default for InMemoryShortUrlRepository {
    fn default() -> Self {
        Self::new(Duration::days(30))
    }
}

#[async_trait]
impl ShortUrlRepository for InMemoryShortUrlRepository {
    async fn select_by_name(&self, name: &str) -> Result<Option<String>, AppError> {
        let records = self.lock()?;

        Ok(records
            .get(name)
            .filter(|record| !record.is_expired())
            .map(|record| record.link.clone()))
    }

    async fn select_by_idempotency_key(
        &self,
        key: &IdempotencyKey,
    ) -> Result<Option<String>, AppError> {
        let records = self.lock()?;

        Ok(records
            .values()
            .filter(|record| &record.idempotency_key == key && !record.is_expired())
            .min_by_key(|record| record.created_at)
            .map(|record| record.link.clone()))
    }

    async fn insert(
        &self,
        id: &ShortUrlId,
        name: &str,
        link: &str,
        idempotency_key: &IdempotencyKey,
    ) -> Result<(), AppError> {
        let mut records = self.lock()?;

        if records.get(name).is_some_and(|record| !record.is_expired()) {
            return Err(AppError::name_conflict(
                "Name is already taken",
                json!({ "name": name }),
            ));
        }

        if records
            .values()
            .any(|record| &record.id == id && record.name != name)
        {
            return Err(AppError::storage(
                "Duplicate short URL id",
                json!({ "id": id.as_str() }),
            ));
        }

        let now = Utc::now();
        records.insert(
            name.to_string(),
            ShortUrl {
                id: id.clone(),
                name: name.to_string(),
                link: link.to_string(),
                idempotency_key: idempotency_key.clone(),
                created_at: now,
                expires_at: now + self.ttl,
            },
        );

        Ok(())
    }
}
