//! Authentication: credential store ports, one-time codes, session tokens,
//! and the orchestrating service.

pub mod code;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;
