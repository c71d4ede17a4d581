//! Bcrypt implementation of the `PasswordHasher` trait.
//!
//! Bcrypt only reads the first 72 bytes of its input. Both `hash` and
//! `verify` truncate through `truncate_password` so a password longer than
//! the limit verifies consistently against its stored hash.

use bcrypt::DEFAULT_COST;

use vitalia_core::auth::password::{truncate_password, PasswordHasher};
use vitalia_types::error::AuthError;

/// Bcrypt-backed password hasher.
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Lower-cost variant for tests; production code uses `new`.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(truncate_password(password), self.cost)
            .map_err(|e| AuthError::Storage(format!("bcrypt hash failed: {e}")))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(truncate_password(password), hash).unwrap_or(false)
    }
}
