//! Response generator port.
//!
//! The chat layer treats the generator as an opaque, possibly-failing call:
//! `(message, context) -> reply text`. The keyword-matched
//! [`scripted::ScriptedResponder`] is the development implementation; a
//! production implementation would call an LLM backend behind this same
//! trait.

pub mod scripted;

pub use scripted::ScriptedResponder;

use uuid::Uuid;

use vitalia_types::chat::TurnKind;
use vitalia_types::error::GenerationError;
use vitalia_types::user::UserProfile;

/// Context handed to the generator alongside the message.
#[derive(Debug, Clone)]
pub struct AgentContext {
    pub user_id: Uuid,
    pub kind: TurnKind,
    pub profile: UserProfile,
}

/// Strategy interface for producing a reply to a user message.
pub trait ResponseGenerator: Send + Sync {
    fn respond(
        &self,
        message: &str,
        context: &AgentContext,
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;
}
