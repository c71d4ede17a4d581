//! Server configuration types, deserialized from `config.toml`.

use serde::{Deserialize, Serialize};

fn default_token_ttl_minutes() -> u64 {
    30
}

fn default_code_ttl_minutes() -> u64 {
    15
}

fn default_code_length() -> usize {
    6
}

fn default_jwt_secret() -> String {
    // Development fallback. Override via config.toml or VITALIA_JWT_SECRET.
    "change-this-secret-in-production".to_string()
}

/// Authentication tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for session token signing.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Session token lifetime in minutes.
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: u64,
    /// Verification code lifetime in minutes.
    #[serde(default = "default_code_ttl_minutes")]
    pub code_ttl_minutes: u64,
    /// Number of digits in a verification code.
    #[serde(default = "default_code_length")]
    pub code_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_minutes: default_token_ttl_minutes(),
            code_ttl_minutes: default_code_ttl_minutes(),
            code_length: default_code_length(),
        }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub auth: AuthConfig,
}
