//! HS256 JWT implementation of the `TokenCodec` trait.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use vitalia_core::auth::token::TokenCodec;
use vitalia_types::auth::TokenClaims;
use vitalia_types::error::TokenError;

/// JWT codec with a symmetric HS256 signing key.
pub struct JwtTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No clock leeway: the revocation TTL assumes exact expiry.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "jti", "exp", "iat"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl TokenCodec for JwtTokenCodec {
    fn encode(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Storage(format!("jwt encode failed: {e}")))
    }

    fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claims(ttl_secs: i64) -> TokenClaims {
        let now = Utc::now().timestamp();
        TokenClaims {
            sub: "a@example.com".to_string(),
            jti: "0193a000-0000-7000-8000-000000000000".to_string(),
            exp: now + ttl_secs,
            iat: now,
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let codec = JwtTokenCodec::new("test-secret");
        let claims = claims(60);

        let token = codec.encode(&claims).unwrap();
        assert_eq!(token.matches('.').count(), 2);

        let decoded = codec.decode(&token).unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.jti, claims.jti);
        assert_eq!(decoded.exp, claims.exp);
    }

    #[test]
    fn test_expired_token_is_expired_not_invalid() {
        let codec = JwtTokenCodec::new("test-secret");
        let token = codec.encode(&claims(-5)).unwrap();
        assert_eq!(codec.decode(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let codec = JwtTokenCodec::new("test-secret");
        let other = JwtTokenCodec::new("other-secret");

        let token = codec.encode(&claims(60)).unwrap();
        assert_eq!(other.decode(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let codec = JwtTokenCodec::new("test-secret");
        let mut token = codec.encode(&claims(60)).unwrap();
        token.push('x');
        assert_eq!(codec.decode(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_garbage_rejected() {
        let codec = JwtTokenCodec::new("test-secret");
        assert_eq!(codec.decode("not.a.jwt").unwrap_err(), TokenError::Invalid);
        assert_eq!(codec.decode("").unwrap_err(), TokenError::Invalid);
    }
}
