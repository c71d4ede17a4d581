//! SQLite revoked-token (logout blacklist) repository implementation.

use chrono::{DateTime, Utc};
use sqlx::Row;

use vitalia_core::auth::repository::RevokedTokenRepository;
use vitalia_types::auth::RevokedToken;
use vitalia_types::error::RepositoryError;

use super::pool::DatabasePool;
use super::format_datetime;

/// SQLite-backed implementation of `RevokedTokenRepository`.
pub struct SqliteRevokedTokenRepository {
    pool: DatabasePool,
}

impl SqliteRevokedTokenRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl RevokedTokenRepository for SqliteRevokedTokenRepository {
    async fn insert(&self, entry: &RevokedToken) -> Result<(), RepositoryError> {
        // Revoking the same token twice is a no-op.
        sqlx::query(
            r#"INSERT INTO revoked_tokens (token_id, user_email, revoked_at, expires_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (token_id) DO NOTHING"#,
        )
        .bind(&entry.token_id)
        .bind(&entry.user_email)
        .bind(format_datetime(&entry.revoked_at))
        .bind(format_datetime(&entry.expires_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn is_revoked(&self, token_id: &str) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM revoked_tokens WHERE token_id = ?")
            .bind(token_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at <= ?")
            .bind(format_datetime(&now))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;
    use chrono::Duration;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_entry(token_id: &str, ttl_minutes: i64) -> RevokedToken {
        let now = Utc::now();
        RevokedToken {
            token_id: token_id.to_string(),
            user_email: "a@x.com".to_string(),
            revoked_at: now,
            expires_at: now + Duration::minutes(ttl_minutes),
        }
    }

    #[tokio::test]
    async fn test_insert_and_check() {
        let pool = test_pool().await;
        let repo = SqliteRevokedTokenRepository::new(pool);

        assert!(!repo.is_revoked("jti-1").await.unwrap());
        repo.insert(&make_entry("jti-1", 30)).await.unwrap();
        assert!(repo.is_revoked("jti-1").await.unwrap());
        assert!(!repo.is_revoked("jti-2").await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_is_idempotent() {
        let pool = test_pool().await;
        let repo = SqliteRevokedTokenRepository::new(pool);

        repo.insert(&make_entry("jti-1", 30)).await.unwrap();
        repo.insert(&make_entry("jti-1", 30)).await.unwrap();
        assert!(repo.is_revoked("jti-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_drops_only_expired_entries() {
        let pool = test_pool().await;
        let repo = SqliteRevokedTokenRepository::new(pool);

        repo.insert(&make_entry("live", 30)).await.unwrap();
        repo.insert(&make_entry("stale", -5)).await.unwrap();

        let purged = repo.purge_expired(Utc::now()).await.unwrap();
        assert_eq!(purged, 1);

        assert!(repo.is_revoked("live").await.unwrap());
        assert!(!repo.is_revoked("stale").await.unwrap());
    }
}
