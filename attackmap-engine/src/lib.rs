pub mod audio;
pub mod feed;
pub mod remote;

use anyhow::Result;
use attackmap_messages::{
    AnalysisFailure, AttackEvent, Command, Event, FeedConfig, SessionId, SynthesisFailure,
};
use flume::{Receiver, Sender};
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::runtime::Runtime;

use audio::AudioPlayer;
use remote::{AnalysisClient, ExplainRequest, SpeechRequest};

/// The dashboard backend.
/// Owns the attack feed and the remote analysis calls, and processes commands from the UI.
pub struct Engine {
    cmd_rx: Receiver<Command>,
    event_tx: Sender<Event>,
    feed_config: FeedConfig,
    client: Arc<dyn AnalysisClient>,
    player: Arc<dyn AudioPlayer>,
}

impl Engine {
    /// Create a new Engine instance.
    pub fn new(
        cmd_rx: Receiver<Command>,
        event_tx: Sender<Event>,
        feed_config: FeedConfig,
        client: Arc<dyn AnalysisClient>,
        player: Arc<dyn AudioPlayer>,
    ) -> Self {
        debug!("Constructing a new engine");
        Self {
            cmd_rx,
            event_tx,
            feed_config,
            client,
            player,
        }
    }

    /// Run the engine (blocking).
    /// The feed runs on its own thread; remote calls run on a tokio runtime
    /// while commands are processed here until `Stop` or the UI hangs up.
    pub fn run(self) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("attackmap-remote")
            .enable_all()
            .build()?;

        let running = Arc::new(AtomicBool::new(true));
        let feed_handle = feed::spawn(
            self.feed_config.clone(),
            self.event_tx.clone(),
            running.clone(),
            runtime.handle().clone(),
        );

        self.process_commands(&runtime);

        running.store(false, Ordering::Relaxed);
        feed_handle
            .join()
            .map_err(|_| anyhow::anyhow!("Feed thread panicked"))?;
        runtime.shutdown_timeout(Duration::from_secs(1));
        info!("Engine stopped");
        Ok(())
    }

    fn process_commands(&self, runtime: &Runtime) {
        loop {
            let msg = self.cmd_rx.recv_timeout(Duration::from_millis(100));

            match msg {
                Ok(Command::Stop) | Err(flume::RecvTimeoutError::Disconnected) => break,
                Ok(Command::Explain { session, attack }) => {
                    debug!("Engine received explain request for {}", session);
                    runtime.spawn(explain(
                        session,
                        attack,
                        self.client.clone(),
                        self.event_tx.clone(),
                    ));
                }
                Ok(Command::Speak { session, text }) => {
                    debug!("Engine received speak request for {}", session);
                    runtime.spawn(speak(
                        session,
                        text,
                        self.client.clone(),
                        self.player.clone(),
                        self.event_tx.clone(),
                    ));
                }
                Err(flume::RecvTimeoutError::Timeout) => {}
            }
        }
    }
}

async fn explain(
    session: SessionId,
    attack: AttackEvent,
    client: Arc<dyn AnalysisClient>,
    event_tx: Sender<Event>,
) {
    // Run in a child task so a panic still produces a result for the session
    let request = ExplainRequest::for_attack(&attack);
    let result = tokio::spawn(async move { client.explain(&request).await })
        .await
        .unwrap_or_else(|e| Err(AnalysisFailure::Task(e.to_string())));
    if let Err(e) = &result {
        warn!("Explanation for {} failed: {}", session, e);
    }
    let _ = event_tx
        .send_async(Event::Explanation { session, result })
        .await;
}

async fn speak(
    session: SessionId,
    text: String,
    client: Arc<dyn AnalysisClient>,
    player: Arc<dyn AudioPlayer>,
    event_tx: Sender<Event>,
) {
    let result = tokio::spawn(async move { synthesize_and_play(&text, client, player).await })
        .await
        .unwrap_or_else(|e| Err(SynthesisFailure::Task(e.to_string())));
    if let Err(e) = &result {
        warn!("Speech for {} failed: {}", session, e);
    }
    let _ = event_tx
        .send_async(Event::SpeechFinished { session, result })
        .await;
}

async fn synthesize_and_play(
    text: &str,
    client: Arc<dyn AnalysisClient>,
    player: Arc<dyn AudioPlayer>,
) -> Result<(), SynthesisFailure> {
    let request = SpeechRequest::for_explanation(text);
    let inline = client.synthesize(&request).await?;
    let pcm = audio::decode_inline_audio(&inline)?;
    debug!(
        "Decoded {} samples at {}",
        pcm.samples.len(),
        pcm.sample_rate
    );
    let wav = pcm.to_wav()?;

    tokio::task::spawn_blocking(move || player.play(wav))
        .await
        .map_err(|e| SynthesisFailure::Playback(e.to_string()))?
}
