//! Verification code, session token, and revocation types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// What a verification code proves control of an email address *for*.
///
/// Codes are scoped by (email, purpose): a signup code cannot be spent on a
/// signin and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePurpose {
    Signup,
    Signin,
    PasswordReset,
}

impl fmt::Display for CodePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodePurpose::Signup => write!(f, "signup"),
            CodePurpose::Signin => write!(f, "signin"),
            CodePurpose::PasswordReset => write!(f, "password_reset"),
        }
    }
}

impl FromStr for CodePurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signup" => Ok(CodePurpose::Signup),
            "signin" => Ok(CodePurpose::Signin),
            "password_reset" => Ok(CodePurpose::PasswordReset),
            other => Err(format!("invalid code purpose: '{other}'")),
        }
    }
}

/// A one-time numeric verification code.
///
/// Consumed (marked used) exactly once; expired codes are deleted when
/// touched. At most one live code exists per (email, purpose).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationCode {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub purpose: CodePurpose,
    pub expires_at: DateTime<Utc>,
    pub is_used: bool,
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
}

/// Claims embedded in a session JWT.
///
/// `sub` is the account email, `jti` the unique token id consulted against
/// the revocation store. `exp`/`iat` are unix timestamps as enforced by the
/// signing library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

/// A minted session token as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until expiry.
    pub expires_in: u64,
}

/// A blacklisted token id, persisted on logout.
///
/// Rows past `expires_at` carry no information (the signature check already
/// rejects the token) and may be purged at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokedToken {
    pub token_id: String,
    pub user_email: String,
    pub revoked_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Outcome of handing a verification code to the mail channel.
///
/// Delivery failure never rolls back code issuance -- the code stays valid,
/// and callers surface the failure so the user can retry or resend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeDelivery {
    Sent,
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_purpose_roundtrip() {
        for purpose in [
            CodePurpose::Signup,
            CodePurpose::Signin,
            CodePurpose::PasswordReset,
        ] {
            let s = purpose.to_string();
            let parsed: CodePurpose = s.parse().unwrap();
            assert_eq!(purpose, parsed);
        }
    }

    #[test]
    fn test_code_purpose_serde_snake_case() {
        let json = serde_json::to_string(&CodePurpose::PasswordReset).unwrap();
        assert_eq!(json, "\"password_reset\"");
        let parsed: CodePurpose = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, CodePurpose::PasswordReset);
    }

    #[test]
    fn test_issued_token_serialize() {
        let token = IssuedToken {
            access_token: "abc.def.ghi".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 1800,
        };
        let json = serde_json::to_string(&token).unwrap();
        assert!(json.contains("\"token_type\":\"bearer\""));
        assert!(json.contains("\"expires_in\":1800"));
    }
}
