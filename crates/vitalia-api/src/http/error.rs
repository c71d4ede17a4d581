//! Application error type mapping to HTTP status codes and envelope format.

use axum::response::{IntoResponse, Response};
use serde_json::json;

use vitalia_types::error::{AuthError, ChatError, CodeError, TokenError};

use crate::http::response::status_for_code;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Authentication flow errors.
    Auth(AuthError),
    /// Chat session/turn errors.
    Chat(ChatError),
    /// Authentication failure outside a service flow (missing header etc.).
    Unauthorized(String),
    /// Validation error.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    /// Machine-readable error code and user-facing message.
    pub fn code_and_message(&self) -> (&'static str, String) {
        match self {
            AppError::Auth(e) => match e {
                AuthError::DuplicateEmail => ("EMAIL_EXISTS", e.to_string()),
                AuthError::InvalidCredentials => ("INVALID_CREDENTIALS", e.to_string()),
                AuthError::AccountInactive => ("ACCOUNT_INACTIVE", e.to_string()),
                AuthError::AccountNotVerified => ("ACCOUNT_NOT_VERIFIED", e.to_string()),
                AuthError::UserNotFound => ("USER_NOT_FOUND", e.to_string()),
                AuthError::Code(CodeError::NotFound) => ("CODE_INVALID", e.to_string()),
                AuthError::Code(CodeError::Expired) => ("CODE_EXPIRED", e.to_string()),
                AuthError::Token(TokenError::Invalid) => ("TOKEN_INVALID", e.to_string()),
                AuthError::Token(TokenError::Expired) => ("TOKEN_EXPIRED", e.to_string()),
                AuthError::Code(CodeError::Storage(_))
                | AuthError::Token(TokenError::Storage(_))
                | AuthError::Storage(_) => ("AUTH_ERROR", "Internal error".to_string()),
            },
            AppError::Chat(e) => match e {
                ChatError::SessionNotFound => ("SESSION_NOT_FOUND", e.to_string()),
                ChatError::NotAuthorized => ("NOT_AUTHORIZED", e.to_string()),
                ChatError::Storage(_) => ("CHAT_ERROR", "Internal error".to_string()),
            },
            AppError::Unauthorized(msg) => ("UNAUTHORIZED", msg.clone()),
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
            AppError::Internal(msg) => ("INTERNAL_ERROR", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = self.code_and_message();
        let status = status_for_code(code);

        if status.is_server_error() {
            tracing::error!(code = %code, "Request failed: {:?}", self);
        }

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
