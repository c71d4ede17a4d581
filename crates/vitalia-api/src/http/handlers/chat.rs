//! Chat message handlers: REST one-shot and the WebSocket stream.
//!
//! - POST /api/v1/chat/message - Send one message, get the response back
//! - GET  /api/v1/chat/ws      - WebSocket chat (`?token=<jwt>`)
//!
//! The WebSocket authenticates once at connect time from the `token` query
//! parameter (browsers cannot set headers on WebSocket upgrades). Each
//! client text frame is one message; the server answers with a `typing`
//! frame followed by a `response` frame. Malformed frames get an `error`
//! frame and the connection stays open. Every exchange is persisted as a
//! chat turn before the response frame goes out.

use std::time::Instant;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use vitalia_core::agent::{AgentContext, ResponseGenerator};
use vitalia_core::chat::repository::ChatRepository;
use vitalia_core::chat::service::ChatService;
use vitalia_types::chat::{ChatTurn, TurnKind};
use vitalia_types::user::UserAccount;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    pub message: String,
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub kind: TurnKind,
}

#[derive(Debug, Serialize)]
pub struct ChatMessageResponse {
    pub session_id: Uuid,
    pub turn_id: Uuid,
    pub response: String,
    pub kind: TurnKind,
    pub response_time_ms: u64,
}

/// Generate a response, persist the exchange, and return the stored turn.
///
/// A failed generation is still an exchange: the error text is stored as
/// the turn's response so it shows up in history like any other reply.
async fn run_turn<R, G>(
    chat: &ChatService<R>,
    responder: &G,
    user: &UserAccount,
    message: &str,
    session_id: Option<Uuid>,
    kind: TurnKind,
) -> Result<ChatTurn, AppError>
where
    R: ChatRepository,
    G: ResponseGenerator,
{
    if message.trim().is_empty() {
        return Err(AppError::Validation("Message must not be empty".to_string()));
    }

    let session = chat.get_or_create_session(&user.id, session_id).await?;

    let context = AgentContext {
        user_id: user.id,
        kind,
        profile: user.profile.clone(),
    };

    let start = Instant::now();
    let response = match responder.respond(message, &context).await {
        Ok(text) => text,
        Err(err) => {
            tracing::error!(user = %user.email, "Response generation failed: {err}");
            format!("Error: {err}")
        }
    };
    let elapsed = start.elapsed().as_millis() as u64;

    let turn = chat
        .record_turn(
            &session,
            message,
            &response,
            kind,
            json!({"fitness_level": user.profile.fitness_level}),
            Some(elapsed),
        )
        .await?;

    Ok(turn)
}

/// POST /api/v1/chat/message
pub async fn send_message(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<ChatMessageRequest>,
) -> Result<Json<ApiResponse<ChatMessageResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let turn = run_turn(
        state.chat_service.as_ref(),
        state.responder.as_ref(),
        &current.user,
        &req.message,
        req.session_id,
        req.kind,
    )
    .await?;

    let data = ChatMessageResponse {
        session_id: turn.session_id,
        turn_id: turn.id,
        response: turn.response,
        kind: turn.kind,
        response_time_ms: turn.response_ms.unwrap_or(0),
    };

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(data, request_id, elapsed)
            .with_link("session", &format!("/api/v1/chat/sessions/{}", turn.session_id)),
    ))
}

// ---------------------------------------------------------------------------
// WebSocket
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct WsAuthQuery {
    pub token: String,
}

/// One client text frame: a message, an optional session to resume, an
/// optional turn kind.
#[derive(Debug, Deserialize)]
struct ClientFrame {
    message: String,
    session_id: Option<Uuid>,
    #[serde(default)]
    kind: TurnKind,
}

/// GET /api/v1/chat/ws?token=<jwt>
///
/// Authentication happens before the upgrade: a bad token gets a plain 401
/// response and no WebSocket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<WsAuthQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.authenticate(&query.token).await?;

    Ok(ws.on_upgrade(move |socket| handle_ws_connection(socket, state, user)))
}

/// Core WebSocket connection handler: one request/response exchange per
/// incoming text frame.
async fn handle_ws_connection(mut socket: WebSocket, state: AppState, user: UserAccount) {
    tracing::debug!(user = %user.email, "WebSocket chat connected");

    while let Some(msg) = socket.recv().await {
        match msg {
            Ok(Message::Text(text)) => {
                let frame: ClientFrame = match serde_json::from_str(&text) {
                    Ok(frame) => frame,
                    Err(err) => {
                        let _ = send_json(
                            &mut socket,
                            &json!({"type": "error", "code": "VALIDATION_ERROR", "message": format!("Malformed frame: {err}")}),
                        )
                        .await;
                        continue;
                    }
                };

                // Let the client render an indicator while we work.
                if send_json(&mut socket, &json!({"type": "typing"})).await.is_err() {
                    break;
                }

                match run_turn(
                    state.chat_service.as_ref(),
                    state.responder.as_ref(),
                    &user,
                    &frame.message,
                    frame.session_id,
                    frame.kind,
                )
                .await
                {
                    Ok(turn) => {
                        let payload = json!({
                            "type": "response",
                            "session_id": turn.session_id,
                            "turn_id": turn.id,
                            "message": turn.response,
                            "kind": turn.kind,
                            "response_time_ms": turn.response_ms.unwrap_or(0),
                        });
                        if send_json(&mut socket, &payload).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        let (code, message) = err.code_and_message();
                        let payload = json!({"type": "error", "code": code, "message": message});
                        if send_json(&mut socket, &payload).await.is_err() {
                            break;
                        }
                    }
                }
            }
            Ok(Message::Close(_)) => break,
            Err(err) => {
                tracing::debug!("WebSocket receive error: {err}");
                break;
            }
            // Ignore binary, ping, pong protocol frames (handled by axum/tungstenite)
            Ok(_) => {}
        }
    }

    tracing::debug!(user = %user.email, "WebSocket chat closed");
}

async fn send_json(socket: &mut WebSocket, payload: &serde_json::Value) -> Result<(), axum::Error> {
    socket
        .send(Message::Text(payload.to_string().into()))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use vitalia_core::auth::repository::UserRepository;
    use vitalia_infra::sqlite::{DatabasePool, SqliteChatRepository, SqliteUserRepository};
    use vitalia_types::error::GenerationError;
    use vitalia_types::user::UserProfile;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    async fn seed_user(pool: &DatabasePool) -> UserAccount {
        let now = Utc::now();
        let user = UserAccount {
            id: Uuid::now_v7(),
            email: "chat@example.com".to_string(),
            password_hash: "$2b$12$fakehash".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            is_verified: true,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login: None,
            profile: UserProfile::default(),
        };
        SqliteUserRepository::new(pool.clone())
            .create(&user)
            .await
            .unwrap();
        user
    }

    struct OfflineResponder;

    impl ResponseGenerator for OfflineResponder {
        async fn respond(
            &self,
            _message: &str,
            _context: &AgentContext,
        ) -> Result<String, GenerationError> {
            Err(GenerationError("model offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_failed_generation_recorded_as_turn_response() {
        let pool = test_pool().await;
        let user = seed_user(&pool).await;
        let chat = ChatService::new(SqliteChatRepository::new(pool));

        let turn = run_turn(&chat, &OfflineResponder, &user, "hello", None, TurnKind::Chat)
            .await
            .unwrap();

        assert!(turn.response.starts_with("Error:"));
        assert!(turn.response.contains("model offline"));

        // The exchange is in history like any other turn.
        let history = chat.history(&turn.session_id, &user.id, None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].response, turn.response);
    }

    #[tokio::test]
    async fn test_empty_message_rejected_before_session_creation() {
        let pool = test_pool().await;
        let user = seed_user(&pool).await;
        let chat = ChatService::new(SqliteChatRepository::new(pool));

        let err = run_turn(&chat, &OfflineResponder, &user, "   ", None, TurnKind::Chat)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(chat.list_sessions(&user.id, None).await.unwrap().is_empty());
    }
}
