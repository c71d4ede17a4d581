//! SQLite verification-code repository implementation.
//!
//! `consume` is a single UPDATE guarded by `is_used = 0` running on the
//! serialized writer connection, so a code can be spent exactly once no
//! matter how many verify calls race on it.

use chrono::{DateTime, Utc};
use sqlx::Row;

use vitalia_core::auth::repository::CodeRepository;
use vitalia_types::auth::{CodePurpose, VerificationCode};
use vitalia_types::error::RepositoryError;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `CodeRepository`.
pub struct SqliteCodeRepository {
    pool: DatabasePool,
}

impl SqliteCodeRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl CodeRepository for SqliteCodeRepository {
    async fn replace(&self, code: &VerificationCode) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        // One live code per (email, purpose): issuing supersedes the old one.
        sqlx::query("DELETE FROM verification_codes WHERE email = ? AND purpose = ?")
            .bind(&code.email)
            .bind(code.purpose.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            r#"INSERT INTO verification_codes (id, email, code, purpose, expires_at, is_used, attempts, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(code.id.to_string())
        .bind(&code.email)
        .bind(&code.code)
        .bind(code.purpose.to_string())
        .bind(format_datetime(&code.expires_at))
        .bind(code.is_used as i64)
        .bind(code.attempts as i64)
        .bind(format_datetime(&code.created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }

    async fn consume(
        &self,
        email: &str,
        code: &str,
        purpose: CodePurpose,
    ) -> Result<Option<DateTime<Utc>>, RepositoryError> {
        let row = sqlx::query(
            r#"UPDATE verification_codes
               SET is_used = 1
               WHERE email = ? AND code = ? AND purpose = ? AND is_used = 0
               RETURNING expires_at"#,
        )
        .bind(email)
        .bind(code)
        .bind(purpose.to_string())
        .fetch_optional(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let expires_at: String = row
                    .try_get("expires_at")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(parse_datetime(&expires_at)?))
            }
            None => Ok(None),
        }
    }

    async fn delete(
        &self,
        email: &str,
        code: &str,
        purpose: CodePurpose,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM verification_codes WHERE email = ? AND code = ? AND purpose = ?")
            .bind(email)
            .bind(code)
            .bind(purpose.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn bump_attempts(
        &self,
        email: &str,
        purpose: CodePurpose,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"UPDATE verification_codes
               SET attempts = attempts + 1
               WHERE email = ? AND purpose = ? AND is_used = 0"#,
        )
        .bind(email)
        .bind(purpose.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM verification_codes WHERE expires_at <= ?")
            .bind(format_datetime(&now))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
