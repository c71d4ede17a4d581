//! Infrastructure layer for Vitalia.
//!
//! Contains implementations of the repository and crypto traits defined in
//! `vitalia-core`: SQLite storage, bcrypt password hashing, HS256 JWT
//! encoding, and the log-backed mail channel.

pub mod config;
pub mod crypto;
pub mod email;
pub mod sqlite;
