//! HTTP/REST API layer for Vitalia.
//!
//! Axum-based REST API at `/api/v1/` with JWT bearer authentication,
//! envelope response format, CORS support, and a WebSocket chat endpoint.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
