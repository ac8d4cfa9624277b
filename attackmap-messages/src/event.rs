use crate::{AnalysisFailure, AttackEvent, SessionId, SynthesisFailure, TransportStatus};

/// Events sent from the engine to the UI.
#[derive(Debug)]
pub enum Event {
    /// Feed lifecycle change.
    Transport(TransportStatus),
    /// A new attack arrived on the feed.
    NewAttack(AttackEvent),
    /// Result of an [`crate::Command::Explain`].
    Explanation {
        session: SessionId,
        result: Result<String, AnalysisFailure>,
    },
    /// A [`crate::Command::Speak`] finished, after playback on success.
    SpeechFinished {
        session: SessionId,
        result: Result<(), SynthesisFailure>,
    },
}
