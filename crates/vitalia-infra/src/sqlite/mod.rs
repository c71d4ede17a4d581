//! SQLite persistence: split reader/writer pool and repository
//! implementations for users, verification codes, revoked tokens, and the
//! chat ledger.

pub mod chat;
pub mod code;
pub mod pool;
pub mod revocation;
pub mod user;

pub use chat::SqliteChatRepository;
pub use code::SqliteCodeRepository;
pub use pool::DatabasePool;
pub use revocation::SqliteRevokedTokenRepository;
pub use user::SqliteUserRepository;

use chrono::{DateTime, Utc};
use vitalia_types::error::RepositoryError;

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
