//! Persistence contract for chat sessions and turns.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use vitalia_types::chat::{ChatSession, ChatTurn};
use vitalia_types::error::RepositoryError;

/// Storage for chat sessions and their turns.
///
/// Sessions are soft-deleted (`is_active = false`); turns are append-only
/// and survive session deletion. All ownership checks are pushed down here
/// so a query scoped by `user_id` can never leak another user's data.
pub trait ChatRepository: Send + Sync {
    fn create_session(
        &self,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Look up a session by id, active or not.
    fn find_session(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send;

    /// Set the title and bump `updated_at`.
    fn retitle_session(
        &self,
        session_id: &Uuid,
        title: &str,
        updated_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Bump `updated_at` only.
    fn touch_session(
        &self,
        session_id: &Uuid,
        updated_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Active sessions for a user, most recently updated first.
    fn list_active_sessions(
        &self,
        user_id: &Uuid,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ChatSession>, RepositoryError>> + Send;

    /// Mark a session inactive if it exists, is active, and belongs to the
    /// user. Returns whether a row was flipped.
    fn soft_delete_session(
        &self,
        session_id: &Uuid,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    fn save_turn(
        &self,
        turn: &ChatTurn,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Turns of a session owned by the user, oldest first.
    fn list_turns(
        &self,
        session_id: &Uuid,
        user_id: &Uuid,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ChatTurn>, RepositoryError>> + Send;
}
