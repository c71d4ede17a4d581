use thiserror::Error;

/// Errors from verification code operations.
///
/// `NotFound` deliberately covers wrong, already-used, and wrong-purpose
/// codes -- callers cannot distinguish them, which prevents enumeration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeError {
    #[error("invalid or expired verification code")]
    NotFound,

    #[error("verification code has expired")]
    Expired,

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from session token operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, malformed structure, missing claims, or revoked id.
    #[error("invalid token")]
    Invalid,

    #[error("token has expired")]
    Expired,

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from authentication flows.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("account is deactivated")]
    AccountInactive,

    #[error("account email is not verified")]
    AccountNotVerified,

    #[error("user not found")]
    UserNotFound,

    #[error(transparent)]
    Code(#[from] CodeError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from chat session/turn operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("session not found")]
    SessionNotFound,

    #[error("session belongs to a different user")]
    NotAuthorized,

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from the response generator collaborator.
#[derive(Debug, Error)]
#[error("response generation failed: {0}")]
pub struct GenerationError(pub String);

/// Errors from the mail delivery collaborator.
#[derive(Debug, Error)]
#[error("mail delivery failed: {0}")]
pub struct MailerError(pub String);

/// Errors from repository operations (used by trait definitions in vitalia-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<RepositoryError> for AuthError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(_) => AuthError::DuplicateEmail,
            RepositoryError::NotFound => AuthError::UserNotFound,
            other => AuthError::Storage(other.to_string()),
        }
    }
}

impl From<RepositoryError> for ChatError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => ChatError::SessionNotFound,
            other => ChatError::Storage(other.to_string()),
        }
    }
}

impl From<RepositoryError> for CodeError {
    fn from(e: RepositoryError) -> Self {
        CodeError::Storage(e.to_string())
    }
}

impl From<RepositoryError> for TokenError {
    fn from(e: RepositoryError) -> Self {
        TokenError::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_error_display_does_not_distinguish_reasons() {
        // Wrong, used, and wrong-purpose codes all surface the same message.
        assert_eq!(
            CodeError::NotFound.to_string(),
            "invalid or expired verification code"
        );
    }

    #[test]
    fn test_auth_error_wraps_code_error() {
        let err: AuthError = CodeError::Expired.into();
        assert_eq!(err.to_string(), "verification code has expired");
    }

    #[test]
    fn test_repository_conflict_maps_to_duplicate_email() {
        let err: AuthError = RepositoryError::Conflict("users.email".to_string()).into();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[test]
    fn test_repository_not_found_maps_to_session_not_found() {
        let err: ChatError = RepositoryError::NotFound.into();
        assert!(matches!(err, ChatError::SessionNotFound));
    }
}
