use attackmap_messages::AttackEvent;

use super::{ExplainRequest, SpeechRequest};

pub const EXPLAINER_INSTRUCTION: &str = "You are a helpful cybersecurity analyst. \
Your goal is to explain cyber attack concepts in a clear, concise, and easy-to-understand \
way for a non-technical audience. Do not use jargon without explaining it. \
Keep responses to a single paragraph.";

/// Delivery instruction prepended to text sent for speech synthesis.
pub const SPEECH_STYLE: &str = "Say with a clear, informative tone:";

impl ExplainRequest {
    pub fn for_attack(attack: &AttackEvent) -> Self {
        let user_query = format!(
            "Explain what a '{}' attack is in simple terms. \
             The simulated attack is from {} to {}. \
             What could be a potential motivation for this type of attack?",
            attack.attack_type(),
            attack.source().country,
            attack.destination().country,
        );
        Self {
            system_instruction: EXPLAINER_INSTRUCTION.to_string(),
            user_query,
        }
    }
}

impl SpeechRequest {
    pub fn for_explanation(explanation: &str) -> Self {
        Self {
            text: format!("{SPEECH_STYLE} {explanation}"),
        }
    }
}
