use flume::Sender;
use log::info;
use std::time::Instant;

use crate::analysis::AnalysisController;
use crate::buffer::EventBuffer;
use crate::globe::GlobeView;
use crate::live_feed::LiveFeed;
use crate::status::FeedStatus;
use attackmap_messages::{Command, Event};

/// Local UI state derived from engine events.
pub(super) struct UiState {
    /// Connection status line
    pub status: FeedStatus,

    /// Most recent attacks, source of the globe arcs
    pub buffer: EventBuffer,

    /// Globe widget state, subscribed to the buffer
    pub globe: GlobeView,

    /// Live feed widget state
    pub live_feed: LiveFeed,

    /// Analysis of the selected attack
    pub analysis: AnalysisController,
}

impl UiState {
    pub fn new(cmd_tx: Sender<Command>) -> Self {
        let mut buffer = EventBuffer::new();
        let globe = GlobeView::new(buffer.subscribe());
        Self {
            status: FeedStatus::Awaiting,
            buffer,
            globe,
            live_feed: LiveFeed::new(),
            analysis: AnalysisController::new(cmd_tx),
        }
    }

    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Transport(signal) => {
                info!("Transport: {:?}", signal);
                self.status = self.status.apply(&signal);
            }
            Event::NewAttack(attack) => {
                self.status = self.status.on_attack();
                self.buffer.push(attack.clone());
                self.live_feed.insert(attack, now);
            }
            Event::Explanation { session, result } => {
                self.analysis.handle_explanation(session, result);
            }
            Event::SpeechFinished { session, result } => {
                self.analysis.handle_speech_finished(session, result);
            }
        }
    }
}
