use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the attack feed the engine connects to.
#[derive(Debug, Clone)]
pub enum FeedConfig {
    /// Generate random attacks between known countries.
    Simulated {
        interval: Duration,
        /// Fixed seed for a reproducible feed.
        seed: Option<u64>,
    },
    /// Replay a newline-delimited JSON recording of attack events.
    Replay {
        path: PathBuf,
        interval: Duration,
        loop_on_eof: bool,
    },
    /// Receive attacks pushed by a websocket server, one JSON frame each.
    Server {
        url: String,
        /// Delay before reconnecting after a failed or dropped connection.
        reconnect_delay: Duration,
    },
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig::Simulated {
            interval: Duration::from_millis(1000),
            seed: None,
        }
    }
}

/// Lifecycle signals raised by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportStatus {
    Connected,
    /// Connection dropped; the transport will try again.
    Disconnected,
    ConnectError(String),
    /// The feed ran out and nothing will reconnect.
    Ended,
}
