//! Chat session and turn types.
//!
//! A session is a named, ordered container of turns belonging to one user.
//! A turn is one user message plus the generated response, persisted together.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Title given to a session until one is derived from its first message.
pub const DEFAULT_SESSION_TITLE: &str = "New Conversation";

/// Category tag for a turn.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (kind IN ('chat', 'health_assessment', 'fitness_plan', 'nutrition_advice'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    Chat,
    HealthAssessment,
    FitnessPlan,
    NutritionAdvice,
}

impl fmt::Display for TurnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnKind::Chat => write!(f, "chat"),
            TurnKind::HealthAssessment => write!(f, "health_assessment"),
            TurnKind::FitnessPlan => write!(f, "fitness_plan"),
            TurnKind::NutritionAdvice => write!(f, "nutrition_advice"),
        }
    }
}

impl FromStr for TurnKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(TurnKind::Chat),
            "health_assessment" => Ok(TurnKind::HealthAssessment),
            "fitness_plan" => Ok(TurnKind::FitnessPlan),
            "nutrition_advice" => Ok(TurnKind::NutritionAdvice),
            other => Err(format!("invalid turn kind: '{other}'")),
        }
    }
}

impl Default for TurnKind {
    fn default() -> Self {
        TurnKind::Chat
    }
}

/// A chat session owned by a single user.
///
/// Ownership is immutable; deletion is a soft flag flip (`is_active = false`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One message/response pair within a session. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: Uuid,
    pub session_id: Uuid,
    pub user_id: Uuid,
    /// The user's message text.
    pub message: String,
    /// The generated response (or error text when generation failed).
    pub response: String,
    pub kind: TurnKind,
    /// Context passed to the generator, kept for auditability.
    pub context: serde_json::Value,
    /// Generation latency in milliseconds.
    pub response_ms: Option<u64>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_kind_roundtrip() {
        for kind in [
            TurnKind::Chat,
            TurnKind::HealthAssessment,
            TurnKind::FitnessPlan,
            TurnKind::NutritionAdvice,
        ] {
            let s = kind.to_string();
            let parsed: TurnKind = s.parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_turn_kind_default() {
        assert_eq!(TurnKind::default(), TurnKind::Chat);
    }

    #[test]
    fn test_turn_kind_serde() {
        let json = serde_json::to_string(&TurnKind::HealthAssessment).unwrap();
        assert_eq!(json, "\"health_assessment\"");
    }

    #[test]
    fn test_chat_session_serialize() {
        let session = ChatSession {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            title: DEFAULT_SESSION_TITLE.to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"title\":\"New Conversation\""));
        assert!(json.contains("\"is_active\":true"));
    }
}
