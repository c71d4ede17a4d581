//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `vitalia-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reader for SELECTs,
//! writer for mutations.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use vitalia_core::chat::repository::ChatRepository;
use vitalia_types::chat::{ChatSession, ChatTurn, TurnKind};
use vitalia_types::error::RepositoryError;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain ChatSession.
struct ChatSessionRow {
    id: String,
    user_id: String,
    title: String,
    is_active: i64,
    created_at: String,
    updated_at: String,
}

impl ChatSessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_session(self) -> Result<ChatSession, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid session id: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;

        Ok(ChatSession {
            id,
            user_id,
            title: self.title,
            is_active: self.is_active != 0,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

/// Internal row type for mapping SQLite rows to domain ChatTurn.
struct ChatTurnRow {
    id: String,
    session_id: String,
    user_id: String,
    message: String,
    response: String,
    kind: String,
    context: String,
    response_ms: Option<i64>,
    created_at: String,
}

impl ChatTurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            user_id: row.try_get("user_id")?,
            message: row.try_get("message")?,
            response: row.try_get("response")?,
            kind: row.try_get("kind")?,
            context: row.try_get("context")?,
            response_ms: row.try_get("response_ms")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_turn(self) -> Result<ChatTurn, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid turn id: {e}")))?;
        let session_id = Uuid::parse_str(&self.session_id)
            .map_err(|e| RepositoryError::Query(format!("invalid session_id: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;
        let kind: TurnKind = self.kind.parse().map_err(RepositoryError::Query)?;
        let context: serde_json::Value = serde_json::from_str(&self.context)
            .map_err(|e| RepositoryError::Query(format!("invalid context: {e}")))?;

        Ok(ChatTurn {
            id,
            session_id,
            user_id,
            message: self.message,
            response: self.response,
            kind,
            context,
            response_ms: self.response_ms.map(|v| v as u64),
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl ChatRepository for SqliteChatRepository {
    async fn create_session(&self, session: &ChatSession) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO chat_sessions (id, user_id, title, is_active, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(session.id.to_string())
        .bind(session.user_id.to_string())
        .bind(&session.title)
        .bind(session.is_active as i64)
        .bind(format_datetime(&session.created_at))
        .bind(format_datetime(&session.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn find_session(
        &self,
        session_id: &Uuid,
    ) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let session_row = ChatSessionRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(session_row.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn retitle_session(
        &self,
        session_id: &Uuid,
        title: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE chat_sessions SET title = ?, updated_at = ? WHERE id = ?")
            .bind(title)
            .bind(format_datetime(&updated_at))
            .bind(session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn touch_session(
        &self,
        session_id: &Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE chat_sessions SET updated_at = ? WHERE id = ?")
            .bind(format_datetime(&updated_at))
            .bind(session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_active_sessions(
        &self,
        user_id: &Uuid,
        limit: u32,
    ) -> Result<Vec<ChatSession>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM chat_sessions
               WHERE user_id = ? AND is_active = 1
               ORDER BY updated_at DESC
               LIMIT ?"#,
        )
        .bind(user_id.to_string())
        .bind(limit as i64)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut sessions = Vec::with_capacity(rows.len());
        for row in &rows {
            let session_row =
                ChatSessionRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            sessions.push(session_row.into_session()?);
        }

        Ok(sessions)
    }

    async fn soft_delete_session(
        &self,
        session_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE chat_sessions
               SET is_active = 0, updated_at = ?
               WHERE id = ? AND user_id = ? AND is_active = 1"#,
        )
        .bind(format_datetime(&Utc::now()))
        .bind(session_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn save_turn(&self, turn: &ChatTurn) -> Result<(), RepositoryError> {
        let context = serde_json::to_string(&turn.context)
            .map_err(|e| RepositoryError::Query(format!("invalid context: {e}")))?;

        sqlx::query(
            r#"INSERT INTO chat_turns (id, session_id, user_id, message, response, kind, context, response_ms, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(turn.id.to_string())
        .bind(turn.session_id.to_string())
        .bind(turn.user_id.to_string())
        .bind(&turn.message)
        .bind(&turn.response)
        .bind(turn.kind.to_string())
        .bind(context)
        .bind(turn.response_ms.map(|v| v as i64))
        .bind(format_datetime(&turn.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_turns(
        &self,
        session_id: &Uuid,
        user_id: &Uuid,
        limit: u32,
    ) -> Result<Vec<ChatTurn>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM chat_turns
               WHERE session_id = ? AND user_id = ?
               ORDER BY created_at ASC
               LIMIT ?"#,
        )
        .bind(session_id.to_string())
        .bind(user_id.to_string())
        .bind(limit as i64)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in &rows {
            let turn_row =
                ChatTurnRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            turns.push(turn_row.into_turn()?);
        }

        Ok(turns)
    }
}
