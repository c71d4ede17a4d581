//! Chat ledger: session lifecycle and append-only conversation turns.

pub mod repository;
pub mod service;

pub use repository::ChatRepository;
pub use service::ChatService;
