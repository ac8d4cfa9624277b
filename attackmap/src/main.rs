mod cli;

use attackmap_engine::Engine;
use attackmap_engine::audio::{AudioPlayer, NullPlayer, RodioPlayer};
use attackmap_engine::remote::{AnalysisClient, GeminiClient};
use attackmap_messages::Command;

use clap::Parser;
use log::{LevelFilter, warn};
use std::io::Write;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    env_logger::builder()
        .format(|buf, record| {
            writeln!(
                buf,
                "{:<5} - mod path |{}| - target | {} | args: |{}|",
                record.level(),
                record.module_path().unwrap_or(""),
                record.target(),
                record.args()
            )
        })
        .filter_level(cli.log_level)
        .filter_module("attackmap_engine", cli.log_level.min(LevelFilter::Info))
        .filter_module("attackmap_ui", cli.log_level)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Warn)
        .init();

    if cli.api_key.is_empty() {
        warn!("No API key configured (set ATTACKMAP_API_KEY); attack analysis will fail");
    }

    let client: Arc<dyn AnalysisClient> = Arc::new(GeminiClient::new(cli.remote_config())?);
    let player: Arc<dyn AudioPlayer> = if cli.mute {
        Arc::new(NullPlayer)
    } else {
        Arc::new(RodioPlayer)
    };
    let feed_config = cli.feed_config();

    // Create flume channels for bidirectional communication
    let (cmd_tx, cmd_rx) = flume::unbounded();
    let (event_tx, event_rx) = flume::unbounded();

    // Spawn engine thread
    let engine_handle = std::thread::spawn(move || {
        let engine = Engine::new(cmd_rx, event_tx, feed_config, client, player);
        engine.run()
    });

    // Run UI on main thread (blocking)
    attackmap_ui::run(event_rx, cmd_tx.clone())?;

    // UI has exited - send stop command to engine
    let _ = cmd_tx.send(Command::Stop);

    // Wait for engine thread to finish
    engine_handle
        .join()
        .map_err(|_| anyhow::anyhow!("Engine thread panicked"))??;

    Ok(())
}
