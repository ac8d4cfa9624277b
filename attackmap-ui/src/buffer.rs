use attackmap_messages::AttackEvent;
use flume::{Receiver, Sender};
use std::collections::VecDeque;
use std::sync::Arc;

/// Number of attacks kept for the globe.
pub const EVENT_BUFFER_CAPACITY: usize = 30;

/// Immutable newest-first view of the buffer.
pub type Snapshot = Arc<[AttackEvent]>;

/// Bounded store of the most recent attacks, newest first.
///
/// Every push sends a fresh snapshot to all subscribers, so renderers
/// redraw from the whole set instead of diffing.
pub struct EventBuffer {
    events: VecDeque<AttackEvent>,
    capacity: usize,
    subscribers: Vec<Sender<Snapshot>>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_BUFFER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity + 1),
            capacity,
            subscribers: Vec::new(),
        }
    }

    /// Insert at the front, evicting the oldest attack past capacity, then notify.
    pub fn push(&mut self, event: AttackEvent) {
        self.events.push_front(event);
        if self.events.len() > self.capacity {
            self.events.pop_back();
        }
        debug_assert!(self.events.len() <= self.capacity);

        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        // Drop subscribers whose receiver is gone
        self.subscribers
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
    }

    pub fn snapshot(&self) -> Snapshot {
        self.events.iter().cloned().collect()
    }

    /// Receive a snapshot after every push.
    pub fn subscribe(&mut self) -> Receiver<Snapshot> {
        let (tx, rx) = flume::unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for EventBuffer {
    fn default() -> Self {
        Self::new()
    }
}
