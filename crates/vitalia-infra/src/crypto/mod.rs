//! Cryptographic implementations: bcrypt password hashing and HS256 JWT
//! encoding.

pub mod jwt;
pub mod password;

pub use jwt::JwtTokenCodec;
pub use password::BcryptPasswordHasher;
