//! PostgreSQL implementation of the short URL repository.

use async_trait::async_trait;
use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{IdempotencyKey, ShortUrlId};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;
use serde_json::json;

/// PostgreSQL repository for short URL storage and lookup.
///
/// Uses SQLx prepared statements. Expiry is filtered in SQL, so expired rows
/// stay in the table until a new insert for the same name replaces them.
pub struct PgShortUrlRepository {
    pool: Arc<PgPool>,
    ttl: Duration,
}

impl PgShortUrlRepository {
    /// Creates a new repository; inserted records live for `ttl`.
    pub fn new(pool: Arc<PgPool>, ttl: Duration) -> Self {
        Self { pool, ttl }
    }

    fn ttl_seconds(&self) -> f64 {
        self.ttl.num_milliseconds() as f64 / 1000.0
    }
}

#[async_trait]
impl ShortUrlRepository for PgShortUrlRepository {
    async fn select_by_name(&self, name: &str) -> Result<Option<String>, AppError> {
        let link = sqlx::query_scalar::<_, String>(
            r#"
            SELECT link
            FROM shorturls
            WHERE name = $1
              AND expires_at > NOW()
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn select_by_idempotency_key(
        &self,
        key: &IdempotencyKey,
    ) -> Result<Option<String>, AppError> {
        let link = sqlx::query_scalar::<_, String>(
            r#"
            SELECT link
            FROM shorturls
            WHERE idempotency_key = $1
              AND expires_at > NOW()
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn insert(
        &self,
        id: &ShortUrlId,
        name: &str,
        link: &str,
        idempotency_key: &IdempotencyKey,
    ) -> Result<(), AppError> {
        // A live row for the name fails the WHERE clause and nothing is returned.
        let inserted = sqlx::query_scalar::<_, String>(
            r#"
            INSERT INTO shorturls (id, name, link, idempotency_key, created_at, expires_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW() + make_interval(secs => $5))
            ON CONFLICT (name) DO UPDATE
            SET id = EXCLUDED.id,
                link = EXCLUDED.link,
                idempotency_key = EXCLUDED.idempotency_key,
                created_at = EXCLUDED.created_at,
                expires_at = EXCLUDED.expires_at
            WHERE shorturls.expires_at <= NOW()
            RETURNING id
            "#,
        )
        .bind(id.as_str())
        .bind(name)
        .bind(link)
        .bind(idempotency_key.as_str())
        .bind(self.ttl_seconds())
        .fetch_optional(self.pool.as_ref())
        .await?;

        match inserted {
            Some(_) => Ok(()),
            None => Err(AppError::name_conflict(
                "Name is already taken",
                json!({ "name": name }),
            )),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
