use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tempfile::NamedTempFile;

use attackmap_engine::Engine;
use attackmap_engine::audio::AudioPlayer;
use attackmap_engine::remote::{AnalysisClient, ExplainRequest, InlineAudio, SpeechRequest};
use attackmap_messages::{
    AnalysisFailure, AttackEvent, AttackType, Command, Endpoint, Event, FeedConfig, SessionId,
    SynthesisFailure, TransportStatus,
};

// Test doubles

struct MockClient {
    explanation: Result<String, AnalysisFailure>,
    speech: Result<InlineAudio, SynthesisFailure>,
    explain_requests: Mutex<Vec<ExplainRequest>>,
    speech_requests: Mutex<Vec<SpeechRequest>>,
}

impl MockClient {
    fn new(
        explanation: Result<String, AnalysisFailure>,
        speech: Result<InlineAudio, SynthesisFailure>,
    ) -> Arc<Self> {
        Arc::new(Self {
            explanation,
            speech,
            explain_requests: Mutex::new(Vec::new()),
            speech_requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl AnalysisClient for MockClient {
    async fn explain(&self, request: &ExplainRequest) -> Result<String, AnalysisFailure> {
        self.explain_requests.lock().unwrap().push(request.clone());
        self.explanation.clone()
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<InlineAudio, SynthesisFailure> {
        self.speech_requests.lock().unwrap().push(request.clone());
        self.speech.clone()
    }
}

#[derive(Default)]
struct RecordingPlayer {
    played: Mutex<Vec<Vec<u8>>>,
}

impl AudioPlayer for RecordingPlayer {
    fn play(&self, wav: Vec<u8>) -> Result<(), SynthesisFailure> {
        self.played.lock().unwrap().push(wav);
        Ok(())
    }
}

// Test helpers to reduce boilerplate

const SYN: &str = r#"{"type":"SYN Flood","source":{"country":"Russia","lat":61.5,"lng":105.3},"destination":{"country":"United States","lat":37.1,"lng":-95.7}}"#;
const UDP: &str = r#"{"type":"UDP Flood","source":{"country":"Brazil","lat":-14.2,"lng":-51.9},"destination":{"country":"India","lat":20.6,"lng":79.0}}"#;

fn create_recording(lines: &[&str]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(temp_file, "{line}").unwrap();
    }
    temp_file.flush().unwrap();
    temp_file
}

fn replay_config(recording: &NamedTempFile) -> FeedConfig {
    FeedConfig::Replay {
        path: recording.path().to_path_buf(),
        interval: Duration::from_millis(1),
        loop_on_eof: false,
    }
}

fn setup_engine(
    feed_config: FeedConfig,
    client: Arc<MockClient>,
    player: Arc<RecordingPlayer>,
) -> (
    flume::Sender<Command>,
    flume::Receiver<Event>,
    JoinHandle<anyhow::Result<()>>,
) {
    let (cmd_tx, cmd_rx) = flume::unbounded::<Command>();
    let (event_tx, event_rx) = flume::unbounded::<Event>();

    let handle = thread::spawn(move || {
        let engine = Engine::new(cmd_rx, event_tx, feed_config, client, player);
        engine.run()
    });

    (cmd_tx, event_rx, handle)
}

fn teardown_engine(cmd_tx: flume::Sender<Command>, handle: JoinHandle<anyhow::Result<()>>) {
    cmd_tx.send(Command::Stop).unwrap();
    let result = handle.join().expect("Engine thread should not panic");
    assert!(result.is_ok(), "Engine should stop cleanly: {:?}", result);
}

/// Skip feed traffic until an analysis result shows up.
fn next_analysis_event(event_rx: &flume::Receiver<Event>) -> Event {
    loop {
        match event_rx.recv_timeout(Duration::from_secs(5)) {
            Ok(Event::Transport(_)) | Ok(Event::NewAttack(_)) => continue,
            Ok(event) => return event,
            Err(e) => panic!("No analysis event received: {:?}", e),
        }
    }
}

fn sample_attack() -> AttackEvent {
    AttackEvent::new(
        AttackType::SynFlood,
        Endpoint::new("Russia", 61.5, 105.3),
        Endpoint::new("United States", 37.1, -95.7),
    )
}

fn pcm_audio(samples: &[i16], mime_type: &str) -> InlineAudio {
    let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    InlineAudio {
        mime_type: mime_type.to_string(),
        data: STANDARD.encode(bytes),
    }
}

#[test]
fn test_engine_replays_feed() {
    let recording = create_recording(&[SYN, UDP]);
    let client = MockClient::new(Ok(String::new()), Err(SynthesisFailure::MissingAudio));
    let (cmd_tx, event_rx, handle) =
        setup_engine(replay_config(&recording), client, Arc::default());

    let mut received = Vec::new();
    loop {
        match event_rx.recv_timeout(Duration::from_secs(2)) {
            Ok(Event::Transport(TransportStatus::Ended)) => break,
            Ok(event) => received.push(event),
            Err(e) => panic!("Feed did not finish: {:?}", e),
        }
    }

    assert!(matches!(
        received[0],
        Event::Transport(TransportStatus::Connected)
    ));
    let attacks: Vec<&AttackEvent> = received
        .iter()
        .filter_map(|event| match event {
            Event::NewAttack(attack) => Some(attack),
            _ => None,
        })
        .collect();
    assert_eq!(attacks.len(), 2);
    assert_eq!(attacks[0].attack_type(), &AttackType::SynFlood);
    assert_eq!(attacks[0].color().as_str(), "#FF4500");
    assert_eq!(attacks[1].source().country, "Brazil");

    teardown_engine(cmd_tx, handle);
}

#[test]
fn test_missing_recording_reports_connect_error() {
    let feed_config = FeedConfig::Replay {
        path: "/nonexistent/path/to/attacks.ndjson".into(),
        interval: Duration::from_millis(1),
        loop_on_eof: false,
    };
    let client = MockClient::new(Ok(String::new()), Err(SynthesisFailure::MissingAudio));
    let (cmd_tx, event_rx, handle) = setup_engine(feed_config, client, Arc::default());

    match event_rx.recv_timeout(Duration::from_secs(2)) {
        Ok(Event::Transport(TransportStatus::ConnectError(reason))) => {
            assert!(reason.contains("attacks.ndjson"), "{reason}");
        }
        other => panic!("Expected ConnectError, got {:?}", other),
    }

    teardown_engine(cmd_tx, handle);
}

#[test]
fn test_engine_explains_attack() {
    let recording = create_recording(&[]);
    let client = MockClient::new(
        Ok("A SYN flood exhausts connections.".to_string()),
        Err(SynthesisFailure::MissingAudio),
    );
    let (cmd_tx, event_rx, handle) =
        setup_engine(replay_config(&recording), client.clone(), Arc::default());

    cmd_tx
        .send(Command::Explain {
            session: SessionId(3),
            attack: sample_attack(),
        })
        .unwrap();

    match next_analysis_event(&event_rx) {
        Event::Explanation { session, result } => {
            assert_eq!(session, SessionId(3));
            assert_eq!(result, Ok("A SYN flood exhausts connections.".to_string()));
        }
        other => panic!("Expected Explanation, got {:?}", other),
    }

    let requests = client.explain_requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].user_query.contains("SYN Flood"));
    assert!(requests[0].user_query.contains("from Russia to United States"));

    drop(requests);
    teardown_engine(cmd_tx, handle);
}

#[test]
fn test_engine_reports_explanation_failure() {
    let recording = create_recording(&[]);
    let client = MockClient::new(
        Err(AnalysisFailure::Status(500)),
        Err(SynthesisFailure::MissingAudio),
    );
    let (cmd_tx, event_rx, handle) =
        setup_engine(replay_config(&recording), client, Arc::default());

    cmd_tx
        .send(Command::Explain {
            session: SessionId(1),
            attack: sample_attack(),
        })
        .unwrap();

    match next_analysis_event(&event_rx) {
        Event::Explanation { session, result } => {
            assert_eq!(session, SessionId(1));
            assert_eq!(result, Err(AnalysisFailure::Status(500)));
        }
        other => panic!("Expected Explanation, got {:?}", other),
    }

    teardown_engine(cmd_tx, handle);
}

#[test]
fn test_engine_speaks_explanation() {
    let recording = create_recording(&[]);
    let samples = [0i16, 1000, -1000, i16::MAX];
    let client = MockClient::new(
        Ok(String::new()),
        Ok(pcm_audio(&samples, "audio/L16;codec=pcm;rate=24000")),
    );
    let player = Arc::new(RecordingPlayer::default());
    let (cmd_tx, event_rx, handle) =
        setup_engine(replay_config(&recording), client.clone(), player.clone());

    cmd_tx
        .send(Command::Speak {
            session: SessionId(5),
            text: "Packets, lots of them.".to_string(),
        })
        .unwrap();

    match next_analysis_event(&event_rx) {
        Event::SpeechFinished { session, result } => {
            assert_eq!(session, SessionId(5));
            assert_eq!(result, Ok(()));
        }
        other => panic!("Expected SpeechFinished, got {:?}", other),
    }

    assert_eq!(
        client.speech_requests.lock().unwrap()[0].text,
        "Say with a clear, informative tone: Packets, lots of them."
    );

    let played = player.played.lock().unwrap();
    assert_eq!(played.len(), 1);
    let reader = hound::WavReader::new(std::io::Cursor::new(played[0].clone())).unwrap();
    assert_eq!(reader.spec().sample_rate, 24_000);
    assert_eq!(reader.len() as usize, samples.len());

    drop(played);
    teardown_engine(cmd_tx, handle);
}

#[test]
fn test_engine_rejects_non_audio_speech() {
    let recording = create_recording(&[]);
    let client = MockClient::new(
        Ok(String::new()),
        Ok(pcm_audio(&[1, 2, 3], "application/json")),
    );
    let player = Arc::new(RecordingPlayer::default());
    let (cmd_tx, event_rx, handle) =
        setup_engine(replay_config(&recording), client, player.clone());

    cmd_tx
        .send(Command::Speak {
            session: SessionId(2),
            text: "hello".to_string(),
        })
        .unwrap();

    match next_analysis_event(&event_rx) {
        Event::SpeechFinished { session, result } => {
            assert_eq!(session, SessionId(2));
            assert!(matches!(result, Err(SynthesisFailure::NotAudio(_))));
        }
        other => panic!("Expected SpeechFinished, got {:?}", other),
    }
    assert!(player.played.lock().unwrap().is_empty());

    teardown_engine(cmd_tx, handle);
}

#[test]
fn test_engine_releases_speech_on_oversized_sample_rate() {
    let recording = create_recording(&[]);
    let client = MockClient::new(
        Ok(String::new()),
        Ok(pcm_audio(&[1, 2], "audio/L16;codec=pcm;rate=3000000000")),
    );
    let player = Arc::new(RecordingPlayer::default());
    let (cmd_tx, event_rx, handle) =
        setup_engine(replay_config(&recording), client, player.clone());

    cmd_tx
        .send(Command::Speak {
            session: SessionId(4),
            text: "hello".to_string(),
        })
        .unwrap();

    match next_analysis_event(&event_rx) {
        Event::SpeechFinished { session, result } => {
            assert_eq!(session, SessionId(4));
            assert!(matches!(result, Err(SynthesisFailure::MalformedFormat(_))));
        }
        other => panic!("Expected SpeechFinished, got {:?}", other),
    }
    assert!(player.played.lock().unwrap().is_empty());

    teardown_engine(cmd_tx, handle);
}

/// Client that panics inside every call.
struct PanickingClient;

#[async_trait]
impl AnalysisClient for PanickingClient {
    async fn explain(&self, _request: &ExplainRequest) -> Result<String, AnalysisFailure> {
        panic!("explain blew up");
    }

    async fn synthesize(&self, _request: &SpeechRequest) -> Result<InlineAudio, SynthesisFailure> {
        panic!("synthesize blew up");
    }
}

#[test]
fn test_engine_reports_panicking_requests() {
    let recording = create_recording(&[]);
    let (cmd_tx, cmd_rx) = flume::unbounded::<Command>();
    let (event_tx, event_rx) = flume::unbounded::<Event>();
    let feed_config = replay_config(&recording);
    let handle = thread::spawn(move || {
        let player: Arc<RecordingPlayer> = Arc::default();
        let engine = Engine::new(cmd_rx, event_tx, feed_config, Arc::new(PanickingClient), player);
        engine.run()
    });

    cmd_tx
        .send(Command::Speak {
            session: SessionId(8),
            text: "hello".to_string(),
        })
        .unwrap();
    match next_analysis_event(&event_rx) {
        Event::SpeechFinished { session, result } => {
            assert_eq!(session, SessionId(8));
            assert!(matches!(result, Err(SynthesisFailure::Task(_))));
        }
        other => panic!("Expected SpeechFinished, got {:?}", other),
    }

    cmd_tx
        .send(Command::Explain {
            session: SessionId(9),
            attack: sample_attack(),
        })
        .unwrap();
    match next_analysis_event(&event_rx) {
        Event::Explanation { session, result } => {
            assert_eq!(session, SessionId(9));
            assert!(matches!(result, Err(AnalysisFailure::Task(_))));
        }
        other => panic!("Expected Explanation, got {:?}", other),
    }

    teardown_engine(cmd_tx, handle);
}

#[test]
fn test_unreachable_server_reports_connect_error() {
    let feed_config = FeedConfig::Server {
        url: "ws://127.0.0.1:9".to_string(),
        reconnect_delay: Duration::from_millis(20),
    };
    let client = MockClient::new(Ok(String::new()), Err(SynthesisFailure::MissingAudio));
    let (cmd_tx, event_rx, handle) = setup_engine(feed_config, client, Arc::default());

    match event_rx.recv_timeout(Duration::from_secs(5)) {
        Ok(Event::Transport(TransportStatus::ConnectError(_))) => {}
        other => panic!("Expected ConnectError, got {:?}", other),
    }

    teardown_engine(cmd_tx, handle);
}

#[test]
fn test_engine_stops_when_ui_hangs_up() {
    let feed_config = FeedConfig::Simulated {
        interval: Duration::from_millis(5),
        seed: Some(1),
    };
    let client = MockClient::new(Ok(String::new()), Err(SynthesisFailure::MissingAudio));
    let (cmd_tx, event_rx, handle) = setup_engine(feed_config, client, Arc::default());

    thread::sleep(Duration::from_millis(50));
    drop(event_rx);
    drop(cmd_tx);

    let result = handle.join();
    assert!(result.is_ok(), "Engine thread should not panic");
}
