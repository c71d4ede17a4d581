//! Application state wiring all services together.
//!
//! Services are generic over repository/hasher/codec traits, but AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use vitalia_core::agent::ScriptedResponder;
use vitalia_core::auth::code::CodeService;
use vitalia_core::auth::service::AuthService;
use vitalia_core::auth::token::TokenService;
use vitalia_core::chat::service::ChatService;
use vitalia_infra::config::{load_server_config, resolve_data_dir};
use vitalia_infra::crypto::{BcryptPasswordHasher, JwtTokenCodec};
use vitalia_infra::email::LogMailer;
use vitalia_infra::sqlite::{
    DatabasePool, SqliteChatRepository, SqliteCodeRepository, SqliteRevokedTokenRepository,
    SqliteUserRepository,
};
use vitalia_types::config::ServerConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAuthService = AuthService<
    SqliteUserRepository,
    BcryptPasswordHasher,
    SqliteCodeRepository,
    JwtTokenCodec,
    SqliteRevokedTokenRepository,
    LogMailer,
>;

pub type ConcreteChatService = ChatService<SqliteChatRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<ConcreteAuthService>,
    pub chat_service: Arc<ConcreteChatService>,
    pub responder: Arc<ScriptedResponder>,
    pub config: Arc<ServerConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_server_config(&data_dir).await;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("vitalia.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        // Wire auth service from its repositories and crypto implementations
        let auth_service = AuthService::new(
            SqliteUserRepository::new(db_pool.clone()),
            BcryptPasswordHasher::new(),
            CodeService::new(
                SqliteCodeRepository::new(db_pool.clone()),
                config.auth.code_ttl_minutes,
                config.auth.code_length,
            ),
            TokenService::new(
                JwtTokenCodec::new(&config.auth.jwt_secret),
                SqliteRevokedTokenRepository::new(db_pool.clone()),
                config.auth.token_ttl_minutes,
            ),
            LogMailer::new(),
        );

        let chat_service = ChatService::new(SqliteChatRepository::new(db_pool.clone()));

        Ok(Self {
            auth_service: Arc::new(auth_service),
            chat_service: Arc::new(chat_service),
            responder: Arc::new(ScriptedResponder::new()),
            config: Arc::new(config),
            data_dir,
            db_pool,
        })
    }
}
