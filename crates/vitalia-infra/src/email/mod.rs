//! Mail channel implementations.

pub mod log;

pub use log::LogMailer;
