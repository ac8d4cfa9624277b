use thiserror::Error;

/// Why an explanation request failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisFailure {
    #[error("network error: {0}")]
    Network(String),

    #[error("API call failed with status: {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    InvalidBody(String),

    #[error("analysis task failed: {0}")]
    Task(String),
}

/// Why a speech synthesis or playback attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisFailure {
    #[error("network error: {0}")]
    Network(String),

    #[error("TTS API error: {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    InvalidBody(String),

    #[error("no audio data received")]
    MissingAudio,

    #[error("response is not audio: {0}")]
    NotAudio(String),

    #[error("audio format has no sample rate: {0}")]
    MalformedFormat(String),

    #[error("malformed audio payload: {0}")]
    MalformedPayload(String),

    #[error("playback failed: {0}")]
    Playback(String),

    #[error("speech task failed: {0}")]
    Task(String),
}
