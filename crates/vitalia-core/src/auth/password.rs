//! PasswordHasher trait for credential hashing.
//!
//! Defined in vitalia-core so the auth service can hash and verify passwords
//! without coupling to a specific algorithm. The `BcryptPasswordHasher`
//! adapter lives in vitalia-infra.

use vitalia_types::error::AuthError;

/// Bcrypt's input limit. Longer passwords are truncated to this many bytes
/// at both hash and verify time so the two sides always agree.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Abstraction over salted, slow adaptive password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password. Input beyond [`MAX_PASSWORD_BYTES`] is
    /// not significant.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a plaintext password against a stored hash, applying the same
    /// truncation as `hash`.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Truncate a password to the hash algorithm's input limit, respecting
/// UTF-8 char boundaries.
pub fn truncate_password(password: &str) -> &str {
    if password.len() <= MAX_PASSWORD_BYTES {
        return password;
    }
    let mut end = MAX_PASSWORD_BYTES;
    while !password.is_char_boundary(end) {
        end -= 1;
    }
    &password[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_password_untouched() {
        assert_eq!(truncate_password("pw12345678"), "pw12345678");
    }

    #[test]
    fn test_exactly_72_bytes_untouched() {
        let pw = "a".repeat(72);
        assert_eq!(truncate_password(&pw), pw);
    }

    #[test]
    fn test_long_password_truncated_to_72() {
        let pw = "a".repeat(80);
        assert_eq!(truncate_password(&pw), "a".repeat(72));
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        // 71 ASCII bytes followed by a 3-byte char straddling the limit.
        let pw = format!("{}\u{20AC}xyz", "a".repeat(71));
        let truncated = truncate_password(&pw);
        assert!(truncated.len() <= MAX_PASSWORD_BYTES);
        assert_eq!(truncated, "a".repeat(71));
    }
}
