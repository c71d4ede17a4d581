//! Chat session HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/chat/sessions      - List the caller's active sessions
//! - GET    /api/v1/chat/sessions/{id} - Session detail with its turns
//! - DELETE /api/v1/chat/sessions/{id} - Soft-delete a session

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vitalia_types::chat::{ChatSession, ChatTurn};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for session listing.
#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    pub limit: Option<u32>,
}

/// Query parameters for the session detail view.
#[derive(Debug, Deserialize)]
pub struct SessionDetailQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SessionDetail {
    pub session: ChatSession,
    pub turns: Vec<ChatTurn>,
}

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// GET /api/v1/chat/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<SessionListQuery>,
) -> Result<Json<ApiResponse<Vec<ChatSession>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sessions = state
        .chat_service
        .list_sessions(&current.user.id, query.limit)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(sessions, request_id, elapsed)
            .with_link("self", "/api/v1/chat/sessions"),
    ))
}

/// GET /api/v1/chat/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(session_id): Path<String>,
    Query(query): Query<SessionDetailQuery>,
) -> Result<Json<ApiResponse<SessionDetail>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = parse_uuid(&session_id)?;
    let session = state.chat_service.get_session(&sid, &current.user.id).await?;
    let turns = state
        .chat_service
        .history(&sid, &current.user.id, query.limit)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(SessionDetail { session, turns }, request_id, elapsed)
            .with_link("self", &format!("/api/v1/chat/sessions/{sid}")),
    ))
}

/// DELETE /api/v1/chat/sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = parse_uuid(&session_id)?;
    state
        .chat_service
        .delete_session(&sid, &current.user.id)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({"message": "Session deleted"}),
        request_id,
        elapsed,
    )))
}
