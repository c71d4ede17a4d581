//! Session lifecycle and turn recording on top of [`ChatRepository`].

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use vitalia_types::chat::{ChatSession, ChatTurn, TurnKind, DEFAULT_SESSION_TITLE};
use vitalia_types::error::ChatError;

use crate::chat::repository::ChatRepository;

/// A session title is derived from the first message, clipped to this many
/// characters before an ellipsis is appended.
const TITLE_MAX_CHARS: usize = 50;

const DEFAULT_SESSION_LIMIT: u32 = 50;
const DEFAULT_HISTORY_LIMIT: u32 = 100;

pub struct ChatService<R: ChatRepository> {
    repo: R,
}

impl<R: ChatRepository> ChatService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Resume the caller's session if the requested id names one of their
    /// active sessions; otherwise start a fresh one. An unknown id is kept
    /// for the new session; a deleted or foreign-owned id never errors but
    /// is already taken, so the new session gets a generated id.
    pub async fn get_or_create_session(
        &self,
        user_id: &Uuid,
        requested: Option<Uuid>,
    ) -> Result<ChatSession, ChatError> {
        let mut keep_id = requested;
        if let Some(id) = requested {
            if let Some(session) = self.repo.find_session(&id).await? {
                if session.user_id == *user_id && session.is_active {
                    return Ok(session);
                }
                debug!(session_id = %id, "Requested session not resumable, starting fresh");
                keep_id = None;
            }
        }

        let now = Utc::now();
        let session = ChatSession {
            id: keep_id.unwrap_or_else(Uuid::now_v7),
            user_id: *user_id,
            title: DEFAULT_SESSION_TITLE.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.repo.create_session(&session).await?;
        info!(session_id = %session.id, "Chat session created");
        Ok(session)
    }

    /// Append one exchange to the session and bump its recency. The first
    /// recorded turn also names the session after the user's message.
    pub async fn record_turn(
        &self,
        session: &ChatSession,
        message: &str,
        response: &str,
        kind: TurnKind,
        context: serde_json::Value,
        response_ms: Option<u64>,
    ) -> Result<ChatTurn, ChatError> {
        let now = Utc::now();
        let turn = ChatTurn {
            id: Uuid::now_v7(),
            session_id: session.id,
            user_id: session.user_id,
            message: message.to_string(),
            response: response.to_string(),
            kind,
            context,
            response_ms,
            created_at: now,
        };
        self.repo.save_turn(&turn).await?;

        if session.title == DEFAULT_SESSION_TITLE {
            match derive_title(message) {
                Some(title) => self.repo.retitle_session(&session.id, &title, now).await?,
                None => self.repo.touch_session(&session.id, now).await?,
            }
        } else {
            self.repo.touch_session(&session.id, now).await?;
        }

        Ok(turn)
    }

    /// Active sessions for the user, most recently updated first.
    pub async fn list_sessions(
        &self,
        user_id: &Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<ChatSession>, ChatError> {
        Ok(self
            .repo
            .list_active_sessions(user_id, limit.unwrap_or(DEFAULT_SESSION_LIMIT))
            .await?)
    }

    /// Look up one of the caller's sessions, enforcing ownership.
    pub async fn get_session(
        &self,
        session_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<ChatSession, ChatError> {
        let session = self
            .repo
            .find_session(session_id)
            .await?
            .ok_or(ChatError::SessionNotFound)?;
        if session.user_id != *user_id {
            return Err(ChatError::NotAuthorized);
        }
        if !session.is_active {
            // Soft-deleted sessions read as gone, not forbidden.
            return Err(ChatError::SessionNotFound);
        }
        Ok(session)
    }

    /// Turns of one of the caller's sessions, oldest first.
    pub async fn history(
        &self,
        session_id: &Uuid,
        user_id: &Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<ChatTurn>, ChatError> {
        self.get_session(session_id, user_id).await?;
        Ok(self
            .repo
            .list_turns(session_id, user_id, limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
            .await?)
    }

    /// Soft-delete one of the caller's sessions. Turns are retained.
    pub async fn delete_session(
        &self,
        session_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<(), ChatError> {
        let session = self
            .repo
            .find_session(session_id)
            .await?
            .ok_or(ChatError::SessionNotFound)?;
        if session.user_id != *user_id {
            return Err(ChatError::NotAuthorized);
        }
        if !self.repo.soft_delete_session(session_id, user_id).await? {
            return Err(ChatError::SessionNotFound);
        }
        info!(session_id = %session_id, "Chat session deleted");
        Ok(())
    }
}

/// Title from the first user message: trimmed, clipped to 50 characters on
/// a char boundary with a trailing ellipsis. Returns `None` for whitespace.
fn derive_title(message: &str) -> Option<String> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().count() <= TITLE_MAX_CHARS {
        return Some(trimmed.to_string());
    }
    let clipped: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
    Some(format!("{clipped}..."))
}
