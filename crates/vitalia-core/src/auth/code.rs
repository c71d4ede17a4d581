//! One-time-code engine.
//!
//! Issues fixed-length numeric codes scoped by (email, purpose) and consumes
//! them exactly once. Issuing a new code invalidates any previous code for
//! the same scope; expired codes are deleted when touched.

use chrono::{Duration, Utc};
use rand::Rng;
use rand::rngs::OsRng;
use tracing::{debug, info};
use uuid::Uuid;

use vitalia_types::auth::{CodePurpose, VerificationCode};
use vitalia_types::error::CodeError;

use crate::auth::repository::CodeRepository;

/// Generate a numeric code of the given length from the OS RNG.
///
/// Digits are drawn independently so leading zeros are valid.
pub fn generate_code(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0u8..10)))
        .collect()
}

/// Issues and consumes one-time verification codes.
pub struct CodeService<R: CodeRepository> {
    repo: R,
    ttl: Duration,
    code_length: usize,
}

impl<R: CodeRepository> CodeService<R> {
    pub fn new(repo: R, ttl_minutes: u64, code_length: usize) -> Self {
        Self {
            repo,
            ttl: Duration::minutes(ttl_minutes as i64),
            code_length,
        }
    }

    /// Issue a fresh code for (email, purpose), invalidating any prior code
    /// for the same scope. Returns the plaintext code for delivery.
    pub async fn issue(&self, email: &str, purpose: CodePurpose) -> Result<String, CodeError> {
        let now = Utc::now();
        let code = generate_code(self.code_length);
        let record = VerificationCode {
            id: Uuid::now_v7(),
            email: email.to_string(),
            code: code.clone(),
            purpose,
            expires_at: now + self.ttl,
            is_used: false,
            attempts: 0,
            created_at: now,
        };

        self.repo.replace(&record).await?;
        info!(email = %email, %purpose, "Verification code issued");
        Ok(code)
    }

    /// Consume a code. Succeeds at most once per issued code.
    ///
    /// No unused match (wrong, already used, or wrong purpose) surfaces as
    /// `NotFound`; a consumed-but-expired code is deleted and surfaces as
    /// `Expired`.
    pub async fn verify(
        &self,
        email: &str,
        code: &str,
        purpose: CodePurpose,
    ) -> Result<(), CodeError> {
        match self.repo.consume(email, code, purpose).await? {
            None => {
                // Track failed guesses against whatever live code exists.
                self.repo.bump_attempts(email, purpose).await?;
                debug!(email = %email, %purpose, "Verification code mismatch");
                Err(CodeError::NotFound)
            }
            Some(expires_at) => {
                if Utc::now() > expires_at {
                    self.repo.delete(email, code, purpose).await?;
                    debug!(email = %email, %purpose, "Verification code expired");
                    return Err(CodeError::Expired);
                }
                info!(email = %email, %purpose, "Verification code accepted");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_length_and_digits() {
        for _ in 0..100 {
            let code = generate_code(6);
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_generate_code_keeps_leading_zeros() {
        // Statistically certain to hit a leading zero across enough draws.
        let hit = (0..5000).any(|_| generate_code(6).starts_with('0'));
        assert!(hit, "no leading zero in 5000 codes");
    }

    #[test]
    fn test_generate_code_varies() {
        let a = generate_code(6);
        let all_same = (0..20).all(|_| generate_code(6) == a);
        assert!(!all_same);
    }
}
