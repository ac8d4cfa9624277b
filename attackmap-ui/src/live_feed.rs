use attackmap_messages::{AttackEvent, FlagResolver};
use eframe::egui::{Color32, CursorIcon, Label, Response, RichText, ScrollArea, Sense, Ui, Widget};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Number of entries visible in the feed.
pub const FEED_CAPACITY: usize = 15;

/// How long a new entry stays highlighted.
pub const PULSE_DURATION: Duration = Duration::from_millis(1000);

/// One rendered line of the live feed.
pub struct FeedEntry {
    attack: AttackEvent,
    text: String,
    inserted_at: Instant,
}

impl FeedEntry {
    pub fn attack(&self) -> &AttackEvent {
        &self.attack
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The pulse is derived from the insertion time, so nothing needs
    /// cancelling when the entry scrolls out early.
    pub fn is_pulsing(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) < PULSE_DURATION
    }
}

/// Feed line text: flags and countries in source → destination order, then the type.
pub fn entry_text(attack: &AttackEvent) -> String {
    let source = &attack.source().country;
    let destination = &attack.destination().country;
    format!(
        "{} {} → {} {} ({})",
        FlagResolver::resolve(source),
        source,
        FlagResolver::resolve(destination),
        destination,
        attack.attack_type()
    )
}

pub(crate) fn to_color32(attack: &AttackEvent) -> Color32 {
    let (r, g, b) = attack.color().rgb();
    Color32::from_rgb(r, g, b)
}

/// Scrolling list of the latest attacks. Clicking an entry selects it.
pub struct LiveFeed {
    entries: VecDeque<FeedEntry>,
    capacity: usize,
    selected: Option<AttackEvent>,
}

impl LiveFeed {
    pub fn new() -> Self {
        Self::with_capacity(FEED_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
            selected: None,
        }
    }

    /// Prepend an entry, dropping the oldest visible one past capacity.
    pub fn insert(&mut self, attack: AttackEvent, now: Instant) {
        let text = entry_text(&attack);
        self.entries.push_front(FeedEntry {
            attack,
            text,
            inserted_at: now,
        });
        if self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The attack clicked during the last frame, if any.
    pub fn take_selected(&mut self) -> Option<AttackEvent> {
        self.selected.take()
    }
}

impl Default for LiveFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &mut LiveFeed {
    fn ui(self, ui: &mut Ui) -> Response {
        let now = Instant::now();
        let mut clicked = None;

        ScrollArea::vertical().show(ui, |ui| {
            for entry in &self.entries {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("●").color(to_color32(&entry.attack)));

                    let mut text = RichText::new(&entry.text);
                    if entry.is_pulsing(now) {
                        text = text.strong().background_color(Color32::from_gray(60));
                    }
                    let response = ui
                        .add(Label::new(text).sense(Sense::click()))
                        .on_hover_cursor(CursorIcon::PointingHand)
                        .on_hover_text(entry.attack.label());
                    if response.clicked() {
                        clicked = Some(entry.attack.clone());
                    }
                });
            }
        });

        if clicked.is_some() {
            self.selected = clicked;
        }
        ui.response()
    }
}
