use attackmap_messages::{
    AnalysisFailure, AttackEvent, Command, SessionId, SynthesisFailure,
};
use flume::Sender;
use log::{debug, info, warn};

/// Shown in place of the explanation when the request fails.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Failed to get analysis. Please check the log for details.";

pub const SPEAK_LABEL: &str = "🔊 Read Aloud";
pub const SPEAK_BUSY_LABEL: &str = "Generating...";

/// Progress of one session's explanation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Requesting,
    Ready,
    Failed,
}

/// The analysis of the currently selected attack.
#[derive(Debug, Clone)]
pub(crate) struct AnalysisSession {
    pub id: SessionId,
    pub attack: AttackEvent,
    pub explanation: Option<String>,
    pub phase: Phase,
}

/// The "read aloud" action, bound to one session's explanation.
#[derive(Debug, Default)]
struct SpeakAction {
    bound_text: Option<String>,
    busy: bool,
}

impl SpeakAction {
    fn is_enabled(&self) -> bool {
        self.bound_text.is_some() && !self.busy
    }
}

/// Drives the explain-then-speak cycle for the selected attack.
///
/// Requests go to the engine as [`Command`]s; results come back through
/// [`Self::handle_explanation`] and [`Self::handle_speech_finished`] and are
/// dropped unless they belong to the active session.
pub struct AnalysisController {
    cmd_tx: Sender<Command>,
    next_id: SessionId,
    session: Option<AnalysisSession>,
    speak: SpeakAction,
}

impl AnalysisController {
    pub fn new(cmd_tx: Sender<Command>) -> Self {
        Self {
            cmd_tx,
            next_id: SessionId(1),
            session: None,
            speak: SpeakAction::default(),
        }
    }

    /// Open a new session for `attack`, superseding any previous one.
    pub fn select(&mut self, attack: AttackEvent) {
        let id = self.next_id;
        self.next_id = id.next();
        info!("Analyzing {} ({})", attack.label(), id);

        // Rebind per session: nothing from the previous explanation survives
        self.speak = SpeakAction::default();
        self.session = Some(AnalysisSession {
            id,
            attack: attack.clone(),
            explanation: None,
            phase: Phase::Requesting,
        });

        if self
            .cmd_tx
            .send(Command::Explain {
                session: id,
                attack,
            })
            .is_err()
        {
            warn!("Engine is gone, cannot request analysis");
            self.fail(id);
        }
    }

    pub fn handle_explanation(
        &mut self,
        session: SessionId,
        result: Result<String, AnalysisFailure>,
    ) {
        let Some(active) = self.active_mut(session) else {
            debug!("Dropping explanation for superseded {}", session);
            return;
        };

        match result {
            Ok(text) => {
                active.phase = Phase::Ready;
                active.explanation = Some(text.clone());
                self.speak = SpeakAction {
                    bound_text: Some(text),
                    busy: false,
                };
            }
            Err(e) => {
                warn!("Analysis failed: {}", e);
                self.fail(session);
            }
        }
    }

    /// Start reading the explanation aloud. No-op while disabled or busy.
    pub fn speak(&mut self) {
        if !self.speak.is_enabled() {
            return;
        }
        let (Some(session), Some(text)) = (self.session_id(), self.speak.bound_text.clone())
        else {
            return;
        };

        self.speak.busy = true;
        if self.cmd_tx.send(Command::Speak { session, text }).is_err() {
            warn!("Engine is gone, cannot synthesize speech");
            self.speak.busy = false;
        }
    }

    pub fn handle_speech_finished(
        &mut self,
        session: SessionId,
        result: Result<(), SynthesisFailure>,
    ) {
        if self.session_id() != Some(session) {
            debug!("Dropping speech result for superseded {}", session);
            return;
        }
        if let Err(e) = result {
            warn!("Read aloud failed: {}", e);
        }
        self.speak.busy = false;
    }

    /// Close the analysis surface and discard the session.
    pub fn dismiss(&mut self) {
        if let Some(session) = self.session.take() {
            debug!("Dismissed {}", session.id);
        }
        self.speak = SpeakAction::default();
    }

    pub fn phase(&self) -> Phase {
        self.session
            .as_ref()
            .map_or(Phase::Idle, |session| session.phase)
    }

    /// Text to show under the header, if the request has completed.
    pub fn display_text(&self) -> Option<&str> {
        let session = self.session.as_ref()?;
        match session.phase {
            Phase::Ready => session.explanation.as_deref(),
            Phase::Failed => Some(ANALYSIS_FAILED_MESSAGE),
            Phase::Idle | Phase::Requesting => None,
        }
    }

    pub fn header(&self) -> Option<String> {
        let attack = &self.session.as_ref()?.attack;
        Some(format!(
            "Analyzing {} from {} to {}",
            attack.attack_type(),
            attack.source().country,
            attack.destination().country
        ))
    }

    pub fn speak_enabled(&self) -> bool {
        self.speak.is_enabled()
    }

    pub fn speak_label(&self) -> &'static str {
        if self.speak.busy {
            SPEAK_BUSY_LABEL
        } else {
            SPEAK_LABEL
        }
    }

    fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|session| session.id)
    }

    fn active_mut(&mut self, id: SessionId) -> Option<&mut AnalysisSession> {
        self.session.as_mut().filter(|session| session.id == id)
    }

    fn fail(&mut self, id: SessionId) {
        if let Some(active) = self.active_mut(id) {
            active.phase = Phase::Failed;
            active.explanation = None;
        }
        self.speak = SpeakAction::default();
    }
}
