//! Keyword-matched canned-response generator.
//!
//! Development stand-in for a real LLM backend. Matches a handful of
//! wellness topics and personalizes the reply with profile fields where it
//! has them.

use vitalia_types::error::GenerationError;
use vitalia_types::user::FitnessLevel;

use super::{AgentContext, ResponseGenerator};

/// Canned-response generator driven by keyword matching.
pub struct ScriptedResponder;

impl ScriptedResponder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScriptedResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseGenerator for ScriptedResponder {
    async fn respond(
        &self,
        message: &str,
        context: &AgentContext,
    ) -> Result<String, GenerationError> {
        let lower = message.to_lowercase();

        if lower.contains("workout") || lower.contains("exercise") || lower.contains("training") {
            let level_hint = match context.profile.fitness_level {
                Some(FitnessLevel::Beginner) => {
                    "Since you're starting out, two or three full-body sessions a week is plenty."
                }
                Some(FitnessLevel::Intermediate) => {
                    "At your level, an upper/lower split four days a week works well."
                }
                Some(FitnessLevel::Advanced) => {
                    "You could handle a five-day split with dedicated accessory work."
                }
                None => "A good starting point is three full-body sessions a week.",
            };
            return Ok(format!(
                "Happy to help with training. {level_hint} Focus on compound \
                 movements and progressive overload, and leave at least one \
                 full rest day between hard sessions."
            ));
        }

        if lower.contains("nutrition") || lower.contains("diet") || lower.contains("eat") {
            return Ok("For nutrition, build meals around a protein source, \
                       vegetables, and whole grains. Aim for roughly 1.6 g of \
                       protein per kg of body weight on training days, and \
                       keep hydration up."
                .to_string());
        }

        if lower.contains("sleep") {
            return Ok("Sleep drives recovery. Target 7-9 hours, keep a \
                       consistent schedule, and avoid screens in the last \
                       hour before bed."
                .to_string());
        }

        if lower.contains("stress") {
            return Ok("For stress, short daily walks, breathing exercises, \
                       and regular training all help. If it persists, talk \
                       to a professional."
                .to_string());
        }

        Ok("I can help with training, nutrition, sleep, and general \
            wellness. What would you like to work on?"
            .to_string())
    }
}
