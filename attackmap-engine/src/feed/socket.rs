use attackmap_messages::{AttackEvent, Event, TransportStatus};
use flume::Sender;
use futures_util::StreamExt;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// Event name the attack server tags new attacks with.
const NEW_ATTACK: &str = "new-attack";

/// How often a blocked connect or read checks for a stop request.
const STOP_POLL: Duration = Duration::from_millis(50);

type AttackStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How one connection ended.
enum Outcome {
    Stopped,
    UiGone,
    Dropped(String),
}

/// Connect to `url` and forward attacks until stopped.
///
/// Every failed attempt raises `ConnectError` and every lost connection
/// raises `Disconnected`; both are retried after `reconnect_delay`.
pub(super) async fn run(
    url: &str,
    reconnect_delay: Duration,
    event_tx: &Sender<Event>,
    running: &AtomicBool,
) {
    while running.load(Ordering::Relaxed) {
        let connected = tokio::select! {
            connected = tokio_tungstenite::connect_async(url) => Some(connected),
            _ = stopped(running) => None,
        };
        let Some(connected) = connected else {
            return;
        };

        let status = match connected {
            Ok((stream, _response)) => {
                info!("Connected to attack server {}", url);
                if event_tx
                    .send_async(Event::Transport(TransportStatus::Connected))
                    .await
                    .is_err()
                {
                    return;
                }
                match forward(stream, event_tx, running).await {
                    Outcome::Stopped | Outcome::UiGone => return,
                    Outcome::Dropped(reason) => {
                        warn!("Lost connection to {}: {}", url, reason);
                        TransportStatus::Disconnected
                    }
                }
            }
            Err(e) => {
                warn!("Failed to connect to {}: {}", url, e);
                TransportStatus::ConnectError(e.to_string())
            }
        };
        if event_tx.send_async(Event::Transport(status)).await.is_err() {
            return;
        }

        tokio::select! {
            _ = tokio::time::sleep(reconnect_delay) => {}
            _ = stopped(running) => return,
        }
    }
}

async fn forward(mut stream: AttackStream, event_tx: &Sender<Event>, running: &AtomicBool) -> Outcome {
    loop {
        let message = tokio::select! {
            message = stream.next() => Some(message),
            _ = stopped(running) => None,
        };
        let Some(message) = message else {
            let _ = stream.close(None).await;
            return Outcome::Stopped;
        };

        match message {
            Some(Ok(Message::Text(text))) => match parse_frame(&text) {
                Some(attack) => {
                    debug!("Server delivered {}", attack.label());
                    if event_tx.send_async(Event::NewAttack(attack)).await.is_err() {
                        let _ = stream.close(None).await;
                        return Outcome::UiGone;
                    }
                }
                None => warn!("Skipping unrecognised frame: {}", text),
            },
            Some(Ok(Message::Close(_))) => return Outcome::Dropped("closed by server".to_string()),
            // Pings are answered by the stream itself
            Some(Ok(_)) => {}
            Some(Err(e)) => return Outcome::Dropped(e.to_string()),
            None => return Outcome::Dropped("stream ended".to_string()),
        }
    }
}

/// Resolves once `running` has been cleared.
async fn stopped(running: &AtomicBool) {
    while running.load(Ordering::Relaxed) {
        tokio::time::sleep(STOP_POLL).await;
    }
}

/// An attack object, or a `["new-attack", {...}]` event pair.
fn parse_frame(text: &str) -> Option<AttackEvent> {
    if let Ok(attack) = serde_json::from_str::<AttackEvent>(text) {
        return Some(attack);
    }
    match serde_json::from_str::<(String, AttackEvent)>(text) {
        Ok((name, attack)) if name == NEW_ATTACK => Some(attack),
        _ => None,
    }
}
