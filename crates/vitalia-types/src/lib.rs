//! Shared domain types for Vitalia.
//!
//! This crate contains the core domain types used across the Vitalia backend:
//! user accounts, verification codes, session tokens, chat sessions/turns,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod user;
