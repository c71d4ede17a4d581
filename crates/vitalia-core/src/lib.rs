//! Business logic and repository trait definitions for Vitalia.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements. It depends only on `vitalia-types` -- never on
//! `vitalia-infra` or any database/IO crate.

pub mod agent;
pub mod auth;
pub mod chat;
pub mod email;
