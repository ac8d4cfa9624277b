use crate::{AttackEvent, SessionId};

/// Commands sent from the UI to the engine.
#[derive(Debug)]
pub enum Command {
    /// Stop the engine and close the feed.
    Stop,
    /// Ask the analysis service to explain an attack.
    Explain {
        session: SessionId,
        attack: AttackEvent,
    },
    /// Synthesize `text` as speech and play it.
    Speak { session: SessionId, text: String },
}
