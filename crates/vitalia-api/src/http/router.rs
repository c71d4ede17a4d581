//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Auth flows
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/verify-email", post(handlers::auth::verify_email))
        .route("/auth/signin", post(handlers::auth::signin))
        .route("/auth/verify-signin", post(handlers::auth::verify_signin))
        .route("/auth/resend-code", post(handlers::auth::resend_code))
        .route("/auth/logout", post(handlers::auth::logout))
        // Account
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/profile", put(handlers::auth::update_profile))
        .route("/auth/change-password", post(handlers::auth::change_password))
        .route("/auth/verify-token", get(handlers::auth::verify_token))
        // Chat
        .route("/chat/message", post(handlers::chat::send_message))
        .route("/chat/ws", get(handlers::chat::ws_handler))
        // Sessions
        .route("/chat/sessions", get(handlers::session::list_sessions))
        .route("/chat/sessions/{id}", get(handlers::session::get_session))
        .route(
            "/chat/sessions/{id}",
            delete(handlers::session::delete_session),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
