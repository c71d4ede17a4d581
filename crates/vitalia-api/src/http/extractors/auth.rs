//! JWT bearer authentication extractor.
//!
//! Extracts the token from the `Authorization: Bearer <token>` header and
//! runs it through the full authentication gate: signature, expiry,
//! revocation blacklist, and account lookup. Handlers that extract
//! [`CurrentUser`] are therefore guaranteed a live, authenticated account.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use vitalia_types::user::UserAccount;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated caller. Extracting this validates the bearer token.
pub struct CurrentUser {
    pub user: UserAccount,
    /// The raw bearer token, kept for logout.
    pub token: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts)?;
        let user = state.auth_service.authenticate(&token).await?;

        Ok(CurrentUser { user, token })
    }
}

/// Extract the bearer token from the Authorization header.
pub fn extract_bearer_token(parts: &Parts) -> Result<String, AppError> {
    let auth = parts.headers.get("authorization").ok_or_else(|| {
        AppError::Unauthorized(
            "Missing token. Provide via 'Authorization: Bearer <token>' header.".to_string(),
        )
    })?;

    let auth_str = auth
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header encoding".to_string()))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AppError::Unauthorized(
            "Authorization header must be 'Bearer <token>'".to_string(),
        )),
    }
}
