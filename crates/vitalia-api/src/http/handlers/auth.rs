//! Authentication HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/auth/signup          - Create an account, email a signup code
//! - POST /api/v1/auth/verify-email    - Consume the signup code, mint a token
//! - POST /api/v1/auth/signin          - Check credentials, email a signin code
//! - POST /api/v1/auth/verify-signin   - Consume the signin code, mint a token
//! - POST /api/v1/auth/resend-code     - Reissue a code for an existing account
//! - POST /api/v1/auth/logout          - Revoke the bearer token
//! - GET  /api/v1/auth/me              - Current account
//! - PUT  /api/v1/auth/profile         - Partial profile update
//! - POST /api/v1/auth/change-password - Rotate the password
//! - GET  /api/v1/auth/verify-token    - Check whether the bearer token is live

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vitalia_core::auth::service::AuthSession;
use vitalia_types::auth::{CodeDelivery, CodePurpose};
use vitalia_types::user::{ProfileUpdate, UserPublic};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResendCodeRequest {
    pub email: String,
    pub purpose: CodePurpose,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Code-issuing endpoints report whether the email went out.
#[derive(Debug, Serialize)]
pub struct CodeIssuedResponse {
    pub message: String,
    pub email_status: String,
}

/// Token payload returned by both verify endpoints.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserPublic,
}

impl From<AuthSession> for TokenResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            access_token: session.token.access_token,
            token_type: session.token.token_type,
            expires_in: session.token.expires_in,
            user: UserPublic::from(&session.user),
        }
    }
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') || trimmed.starts_with('@') {
        return Err(AppError::Validation(format!("Invalid email address: '{email}'")));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    Ok(())
}

fn delivery_status(delivery: &CodeDelivery) -> &'static str {
    match delivery {
        CodeDelivery::Sent => "sent",
        CodeDelivery::Failed(_) => "email_failed",
    }
}

/// POST /api/v1/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<ApiResponse<CodeIssuedResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    validate_email(&req.email)?;
    validate_password(&req.password)?;
    if req.first_name.trim().is_empty() {
        return Err(AppError::Validation("First name is required".to_string()));
    }

    let delivery = state
        .auth_service
        .signup(
            req.email.trim(),
            &req.password,
            req.first_name.trim(),
            req.last_name.trim(),
        )
        .await?;

    let data = CodeIssuedResponse {
        message: "Account created. Check your email for a verification code.".to_string(),
        email_status: delivery_status(&delivery).to_string(),
    };

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(data, request_id, elapsed)))
}

/// POST /api/v1/auth/verify-email
pub async fn verify_email(
    State(state): State<AppState>,
    Json(req): Json<VerifyCodeRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = state
        .auth_service
        .verify_email(req.email.trim(), req.code.trim())
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(session.into(), request_id, elapsed)))
}

/// POST /api/v1/auth/signin
pub async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> Result<Json<ApiResponse<CodeIssuedResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    validate_email(&req.email)?;

    let delivery = state
        .auth_service
        .signin(req.email.trim(), &req.password)
        .await?;

    let data = CodeIssuedResponse {
        message: "Check your email for a sign-in code.".to_string(),
        email_status: delivery_status(&delivery).to_string(),
    };

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(data, request_id, elapsed)))
}

/// POST /api/v1/auth/verify-signin
pub async fn verify_signin(
    State(state): State<AppState>,
    Json(req): Json<VerifyCodeRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = state
        .auth_service
        .verify_signin(req.email.trim(), req.code.trim())
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(session.into(), request_id, elapsed)))
}

/// POST /api/v1/auth/resend-code
pub async fn resend_code(
    State(state): State<AppState>,
    Json(req): Json<ResendCodeRequest>,
) -> Result<Json<ApiResponse<CodeIssuedResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    validate_email(&req.email)?;

    let delivery = state
        .auth_service
        .resend_code(req.email.trim(), req.purpose)
        .await?;

    let data = CodeIssuedResponse {
        message: "A new code is on its way.".to_string(),
        email_status: delivery_status(&delivery).to_string(),
    };

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(data, request_id, elapsed)))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    state.auth_service.logout(&current.token).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({"message": "Logged out"}),
        request_id,
        elapsed,
    )))
}

/// GET /api/v1/auth/me
pub async fn me(current: CurrentUser) -> Json<ApiResponse<UserPublic>> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let user = UserPublic::from(&current.user);

    let elapsed = start.elapsed().as_millis() as u64;
    Json(ApiResponse::success(user, request_id, elapsed).with_link("self", "/api/v1/auth/me"))
}

/// PUT /api/v1/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ApiResponse<UserPublic>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let updated = state
        .auth_service
        .update_profile(&current.user.id, &update)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        UserPublic::from(&updated),
        request_id,
        elapsed,
    )))
}

/// POST /api/v1/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    validate_password(&req.new_password)?;

    state
        .auth_service
        .change_password(&current.user, &req.current_password, &req.new_password)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({"message": "Password updated"}),
        request_id,
        elapsed,
    )))
}

/// GET /api/v1/auth/verify-token
///
/// The extractor does all the work; reaching the handler means the token is
/// live (signed, unexpired, not revoked, account still present).
pub async fn verify_token(current: CurrentUser) -> Json<ApiResponse<serde_json::Value>> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let data = serde_json::json!({
        "valid": true,
        "user": UserPublic::from(&current.user),
    });

    let elapsed = start.elapsed().as_millis() as u64;
    Json(ApiResponse::success(data, request_id, elapsed))
}
