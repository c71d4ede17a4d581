//! Repository traits for the authentication subsystem.
//!
//! Implementations live in vitalia-infra (e.g. `SqliteUserRepository`).
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use chrono::{DateTime, Utc};
use uuid::Uuid;

use vitalia_types::auth::{CodePurpose, RevokedToken, VerificationCode};
use vitalia_types::error::RepositoryError;
use vitalia_types::user::{ProfileUpdate, UserAccount};

/// Repository trait for user account persistence.
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `Conflict` when the email is taken.
    fn create(
        &self,
        user: &UserAccount,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<UserAccount>, RepositoryError>> + Send;

    fn find_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<UserAccount>, RepositoryError>> + Send;

    /// Flip `is_verified` on. Returns false when no such user exists.
    fn mark_verified(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Record a successful login. Returns false when no such user exists.
    fn update_last_login(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Apply a partial profile update and return the refreshed account.
    fn update_profile(
        &self,
        id: &Uuid,
        update: &ProfileUpdate,
    ) -> impl std::future::Future<Output = Result<UserAccount, RepositoryError>> + Send;

    fn update_password_hash(
        &self,
        id: &Uuid,
        password_hash: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Repository trait for one-time verification codes.
///
/// The consume operation must be atomic with respect to concurrent callers:
/// exactly one of two simultaneous `consume` calls for the same live code
/// may see it.
pub trait CodeRepository: Send + Sync {
    /// Delete every code for (email, purpose), then insert the given one.
    /// Enforces the at-most-one-live-code invariant per scope.
    fn replace(
        &self,
        code: &VerificationCode,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Atomically mark the matching unused code as used.
    ///
    /// Returns the code's expiry when a match was consumed, `None` when no
    /// unused code matched (wrong code, already used, or wrong purpose).
    fn consume(
        &self,
        email: &str,
        code: &str,
        purpose: CodePurpose,
    ) -> impl std::future::Future<Output = Result<Option<DateTime<Utc>>, RepositoryError>> + Send;

    /// Remove a specific code row (used after consuming an expired code).
    fn delete(
        &self,
        email: &str,
        code: &str,
        purpose: CodePurpose,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Increment the attempt counter on the live code for (email, purpose).
    fn bump_attempts(
        &self,
        email: &str,
        purpose: CodePurpose,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete all codes whose expiry has passed. Returns rows removed.
    fn purge_expired(
        &self,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}

/// Repository trait for the token revocation store (blacklist).
pub trait RevokedTokenRepository: Send + Sync {
    /// Record a revoked token id. Idempotent: inserting the same id twice
    /// is harmless (token_id is the dedup key).
    fn insert(
        &self,
        entry: &RevokedToken,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn is_revoked(
        &self,
        token_id: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Delete entries whose original token expiry has passed. Returns rows
    /// removed. Called opportunistically; there is no background sweeper.
    fn purge_expired(
        &self,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
