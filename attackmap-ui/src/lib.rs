mod analysis;
mod analysis_window;
mod buffer;
mod globe;
mod live_feed;
mod state;
mod status;

pub use analysis::{AnalysisController, Phase};
pub use buffer::{EVENT_BUFFER_CAPACITY, EventBuffer, Snapshot};
pub use live_feed::{FEED_CAPACITY, FeedEntry, LiveFeed, PULSE_DURATION, entry_text};
pub use status::FeedStatus;

use attackmap_messages::{Command, Event};
use state::UiState;
use std::time::Instant;

/// Main application struct implementing the egui App trait.
pub struct AttackMapApp {
    /// Receiver for events from engine
    event_rx: flume::Receiver<Event>,

    /// Local application state
    state: UiState,
}

impl AttackMapApp {
    fn new(event_rx: flume::Receiver<Event>, cmd_tx: flume::Sender<Command>) -> Self {
        Self {
            event_rx,
            state: UiState::new(cmd_tx),
        }
    }
}

impl eframe::App for AttackMapApp {
    fn update(&mut self, ctx: &eframe::egui::Context, _frame: &mut eframe::Frame) {
        // Process all pending events in arrival order
        let now = Instant::now();
        while let Ok(event) = self.event_rx.try_recv() {
            self.state.handle_event(event, now);
        }

        // Globe rotation and arc dashes animate continuously
        ctx.request_repaint();

        eframe::egui::SidePanel::right("live_feed")
            .default_width(360.0)
            .show(ctx, |ui| {
                ui.heading("Live Attack Feed");
                ui.add(&self.state.status);
                ui.separator();
                ui.add(&mut self.state.live_feed);
            });

        if let Some(attack) = self.state.live_feed.take_selected() {
            self.state.analysis.select(attack);
        }

        eframe::egui::CentralPanel::default().show(ctx, |ui| {
            ui.add(&mut self.state.globe);
        });

        analysis_window::show(ctx, &mut self.state.analysis);
    }
}

/// Entry point for the UI module.
///
/// Runs the eframe application on the main thread (blocking).
pub fn run(event_rx: flume::Receiver<Event>, cmd_tx: flume::Sender<Command>) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("AttackMap"),
        ..Default::default()
    };

    eframe::run_native(
        "AttackMap",
        options,
        Box::new(|_cc| Ok(Box::new(AttackMapApp::new(event_rx, cmd_tx)))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
