use attackmap_engine::remote::RemoteConfig;
use attackmap_messages::FeedConfig;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Live attack map with AI explanations", long_about = None)]
pub struct Cli {
    /// Receive attacks from a websocket server instead of the simulated feed
    #[arg(long, value_name = "URL", conflicts_with_all = ["replay", "seed"])]
    pub server: Option<String>,

    /// Delay before reconnecting to the server in milliseconds
    #[arg(long, default_value_t = 1000, requires = "server")]
    pub reconnect_ms: u64,

    /// Replay a newline-delimited JSON recording instead of the simulated feed
    #[arg(long, value_name = "PATH")]
    pub replay: Option<PathBuf>,

    /// Restart the recording when it ends
    #[arg(long, requires = "replay")]
    pub loop_replay: bool,

    /// Delay between feed events in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub interval_ms: u64,

    /// Seed for a reproducible simulated feed
    #[arg(long, conflicts_with = "replay")]
    pub seed: Option<u64>,

    /// API key for the analysis service
    #[arg(long, env = "ATTACKMAP_API_KEY", hide_env_values = true, default_value = "")]
    pub api_key: String,

    /// Base URL of the analysis service
    #[arg(long, default_value = "https://generativelanguage.googleapis.com/v1beta")]
    pub api_base: String,

    /// Model used for explanations
    #[arg(long, default_value = "gemini-2.5-flash-preview-05-20")]
    pub text_model: String,

    /// Model used for speech synthesis
    #[arg(long, default_value = "gemini-2.5-flash-preview-tts")]
    pub tts_model: String,

    /// Timeout for each remote request in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Don't play synthesized speech
    #[arg(long)]
    pub mute: bool,

    /// Set the logging level (off, error, warn, info, debug, trace)
    #[arg(short, long, default_value = "debug")]
    pub log_level: LevelFilter,
}

impl Cli {
    pub fn feed_config(&self) -> FeedConfig {
        let interval = Duration::from_millis(self.interval_ms);
        if let Some(url) = &self.server {
            return FeedConfig::Server {
                url: url.clone(),
                reconnect_delay: Duration::from_millis(self.reconnect_ms),
            };
        }
        match &self.replay {
            Some(path) => FeedConfig::Replay {
                path: path.clone(),
                interval,
                loop_on_eof: self.loop_replay,
            },
            None => FeedConfig::Simulated {
                interval,
                seed: self.seed,
            },
        }
    }

    pub fn remote_config(&self) -> RemoteConfig {
        RemoteConfig {
            api_base: self.api_base.clone(),
            api_key: self.api_key.clone(),
            text_model: self.text_model.clone(),
            tts_model: self.tts_model.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}
