mod replay;
mod simulated;
mod socket;

use anyhow::Result;
use attackmap_messages::{AttackEvent, Event, FeedConfig, TransportStatus};
use flume::Sender;
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;

pub use replay::ReplaySource;
pub use simulated::SimulatedSource;

/// Abstraction for polled attack feeds (simulated backend, recordings).
///
/// Push-driven feeds run as async tasks instead, see [`FeedConfig::Server`].
pub trait AttackSource {
    /// Next attack, or `None` once the feed has ended.
    fn next_attack(&mut self) -> Result<Option<AttackEvent>>;
}

/// Open a polled source and the delay between its events.
///
/// Returns `None` for configurations that are not polled.
pub fn build_source(config: &FeedConfig) -> Option<Result<(Box<dyn AttackSource>, Duration)>> {
    let source = match config {
        FeedConfig::Simulated { interval, seed } => {
            let source: Box<dyn AttackSource> = Box::new(SimulatedSource::new(*seed));
            Ok((source, *interval))
        }
        FeedConfig::Replay {
            path,
            interval,
            loop_on_eof,
        } => ReplaySource::new(path, *loop_on_eof)
            .map(|source| (Box::new(source) as Box<dyn AttackSource>, *interval)),
        FeedConfig::Server { .. } => return None,
    };
    Some(source)
}

/// Run the feed on its own thread until `running` is cleared, the feed ends,
/// or the UI hangs up. Websocket feeds are driven on `runtime`.
pub(crate) fn spawn(
    config: FeedConfig,
    event_tx: Sender<Event>,
    running: Arc<AtomicBool>,
    runtime: Handle,
) -> thread::JoinHandle<()> {
    thread::spawn(move || match &config {
        FeedConfig::Server {
            url,
            reconnect_delay,
        } => runtime.block_on(socket::run(url, *reconnect_delay, &event_tx, &running)),
        _ => run_polled(&config, &event_tx, &running),
    })
}

fn run_polled(config: &FeedConfig, event_tx: &Sender<Event>, running: &AtomicBool) {
    let (mut source, interval) = match build_source(config) {
        Some(Ok(opened)) => opened,
        Some(Err(e)) => {
            warn!("Failed to connect to the attack feed: {:#}", e);
            let _ = event_tx.send(Event::Transport(TransportStatus::ConnectError(
                e.to_string(),
            )));
            return;
        }
        None => return,
    };

    info!("Connected to attack feed");
    if event_tx
        .send(Event::Transport(TransportStatus::Connected))
        .is_err()
    {
        return;
    }

    while running.load(Ordering::Relaxed) {
        match source.next_attack() {
            Ok(Some(attack)) => {
                debug!("Feed delivered {}", attack.label());
                if event_tx.send(Event::NewAttack(attack)).is_err() {
                    // UI has gone away
                    return;
                }
            }
            Ok(None) => {
                info!("Attack feed ended");
                break;
            }
            Err(e) => {
                warn!("Attack feed failed: {:#}", e);
                break;
            }
        }
        sleep_while_running(interval, running);
    }

    // Nothing reopens a polled source
    let _ = event_tx.send(Event::Transport(TransportStatus::Ended));
}

/// Sleep in short slices so a stop request is honoured promptly.
fn sleep_while_running(duration: Duration, running: &AtomicBool) {
    let deadline = Instant::now() + duration;
    loop {
        let now = Instant::now();
        if now >= deadline || !running.load(Ordering::Relaxed) {
            return;
        }
        thread::sleep((deadline - now).min(Duration::from_millis(50)));
    }
}
