//! Session token service: mint, validate, revoke.
//!
//! Tokens are signed MAC-based bearer tokens carrying subject email, a
//! unique token id (jti), and expiry. Only revocations are persisted --
//! a token is valid iff its signature checks out, it is unexpired, and its
//! jti is absent from the revocation store. Validation therefore always
//! consults storage and cannot be a pure/local operation.

use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use vitalia_types::auth::{IssuedToken, RevokedToken, TokenClaims};
use vitalia_types::error::TokenError;

use crate::auth::repository::RevokedTokenRepository;

/// Abstraction over token signing and verification.
///
/// `decode` must enforce signature validity and expiry (the signing-library
/// side of validation); the revocation check is layered on top by
/// [`TokenService`]. The `JwtTokenCodec` adapter lives in vitalia-infra.
pub trait TokenCodec: Send + Sync {
    fn encode(&self, claims: &TokenClaims) -> Result<String, TokenError>;

    /// Verify signature and expiry, returning the claims.
    fn decode(&self, token: &str) -> Result<TokenClaims, TokenError>;
}

/// Mints, validates, and revokes session tokens.
pub struct TokenService<C: TokenCodec, R: RevokedTokenRepository> {
    codec: C,
    revoked: R,
    ttl: Duration,
}

impl<C: TokenCodec, R: RevokedTokenRepository> TokenService<C, R> {
    pub fn new(codec: C, revoked: R, ttl_minutes: u64) -> Self {
        Self {
            codec,
            revoked,
            ttl: Duration::minutes(ttl_minutes as i64),
        }
    }

    /// Mint a signed token for the given subject with a fresh jti.
    pub fn mint(&self, email: &str) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: email.to_string(),
            jti: Uuid::now_v7().to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        let access_token = self.codec.encode(&claims)?;
        Ok(IssuedToken {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: self.ttl.num_seconds() as u64,
        })
    }

    /// Validate a token: signature, expiry, required claims, and absence
    /// from the revocation store.
    pub async fn validate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let claims = self.codec.decode(token)?;

        if claims.sub.is_empty() || claims.jti.is_empty() {
            return Err(TokenError::Invalid);
        }

        if self.revoked.is_revoked(&claims.jti).await? {
            debug!(jti = %claims.jti, "Rejected revoked token");
            return Err(TokenError::Invalid);
        }

        Ok(claims)
    }

    /// Revoke a token by blacklisting its jti until its natural expiry.
    ///
    /// Returns false when the token cannot be decoded (nothing to
    /// blacklist). Re-revoking an already revoked token is harmless.
    pub async fn revoke(&self, token: &str) -> Result<bool, TokenError> {
        let claims = match self.codec.decode(token) {
            Ok(claims) if !claims.sub.is_empty() && !claims.jti.is_empty() => claims,
            _ => return Ok(false),
        };

        let expires_at = chrono::DateTime::from_timestamp(claims.exp, 0)
            .ok_or(TokenError::Invalid)?;

        // Entries past their original expiry no longer gate anything;
        // prune them while the writer is already engaged.
        let _ = self.revoked.purge_expired(Utc::now()).await?;

        self.revoked
            .insert(&RevokedToken {
                token_id: claims.jti.clone(),
                user_email: claims.sub.clone(),
                revoked_at: Utc::now(),
                expires_at,
            })
            .await?;

        info!(email = %claims.sub, jti = %claims.jti, "Token revoked");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    use vitalia_types::error::RepositoryError;

    use crate::auth::repository::RevokedTokenRepository;

    /// Unsigned codec for exercising TokenService logic without crypto.
    struct PlainCodec;

    impl TokenCodec for PlainCodec {
        fn encode(&self, claims: &TokenClaims) -> Result<String, TokenError> {
            Ok(format!("{}|{}|{}|{}", claims.sub, claims.jti, claims.exp, claims.iat))
        }

        fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
            let parts: Vec<&str> = token.split('|').collect();
            if parts.len() != 4 {
                return Err(TokenError::Invalid);
            }
            let exp: i64 = parts[2].parse().map_err(|_| TokenError::Invalid)?;
            let iat: i64 = parts[3].parse().map_err(|_| TokenError::Invalid)?;
            if exp < Utc::now().timestamp() {
                return Err(TokenError::Expired);
            }
            Ok(TokenClaims {
                sub: parts[0].to_string(),
                jti: parts[1].to_string(),
                exp,
                iat,
            })
        }
    }

    #[derive(Default)]
    struct MemoryRevocations {
        ids: Mutex<HashSet<String>>,
    }

    impl RevokedTokenRepository for MemoryRevocations {
        async fn insert(&self, entry: &RevokedToken) -> Result<(), RepositoryError> {
            self.ids.lock().unwrap().insert(entry.token_id.clone());
            Ok(())
        }

        async fn is_revoked(&self, token_id: &str) -> Result<bool, RepositoryError> {
            Ok(self.ids.lock().unwrap().contains(token_id))
        }

        async fn purge_expired(
            &self,
            _now: chrono::DateTime<Utc>,
        ) -> Result<u64, RepositoryError> {
            Ok(0)
        }
    }

    fn service() -> TokenService<PlainCodec, MemoryRevocations> {
        TokenService::new(PlainCodec, MemoryRevocations::default(), 30)
    }

    #[tokio::test]
    async fn test_mint_then_validate_returns_subject() {
        let svc = service();
        let token = svc.mint("a@x.com").unwrap();
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.expires_in, 30 * 60);

        let claims = svc.validate(&token.access_token).await.unwrap();
        assert_eq!(claims.sub, "a@x.com");
        assert!(!claims.jti.is_empty());
    }

    #[tokio::test]
    async fn test_mint_revoke_validate_fails() {
        let svc = service();
        let token = svc.mint("a@x.com").unwrap();

        assert!(svc.revoke(&token.access_token).await.unwrap());

        // Embedded expiry has not passed, but the jti is blacklisted.
        let err = svc.validate(&token.access_token).await.unwrap_err();
        assert_eq!(err, TokenError::Invalid);
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let svc = service();
        let token = svc.mint("a@x.com").unwrap();
        assert!(svc.revoke(&token.access_token).await.unwrap());
        assert!(svc.revoke(&token.access_token).await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_undecodable_token_returns_false() {
        let svc = service();
        assert!(!svc.revoke("not a token").await.unwrap());
    }

    #[tokio::test]
    async fn test_validate_rejects_garbage() {
        let svc = service();
        assert_eq!(
            svc.validate("garbage").await.unwrap_err(),
            TokenError::Invalid
        );
    }

    #[tokio::test]
    async fn test_each_mint_gets_fresh_jti() {
        let svc = service();
        let t1 = svc.mint("a@x.com").unwrap();
        let t2 = svc.mint("a@x.com").unwrap();
        let c1 = svc.validate(&t1.access_token).await.unwrap();
        let c2 = svc.validate(&t2.access_token).await.unwrap();
        assert_ne!(c1.jti, c2.jti);

        // Revoking one token leaves the other valid.
        svc.revoke(&t1.access_token).await.unwrap();
        assert!(svc.validate(&t1.access_token).await.is_err());
        assert!(svc.validate(&t2.access_token).await.is_ok());
    }
}
