mod gemini;
mod prompts;

use async_trait::async_trait;
use attackmap_messages::{AnalysisFailure, SynthesisFailure};
use std::time::Duration;

pub use gemini::GeminiClient;
pub use prompts::{EXPLAINER_INSTRUCTION, SPEECH_STYLE};

/// A request for a plain-language explanation of one attack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainRequest {
    pub system_instruction: String,
    pub user_query: String,
}

/// A request to read `text` aloud. The response is always audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub text: String,
}

/// Audio returned inline by the speech service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineAudio {
    /// Format descriptor, e.g. `audio/L16;codec=pcm;rate=24000`.
    pub mime_type: String,
    /// Base64 encoded little-endian 16-bit PCM.
    pub data: String,
}

/// The remote generative-language service.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Explanation text; a response without text yields the default explanation.
    async fn explain(&self, request: &ExplainRequest) -> Result<String, AnalysisFailure>;

    /// Synthesized speech for the request text.
    async fn synthesize(&self, request: &SpeechRequest) -> Result<InlineAudio, SynthesisFailure>;
}

/// Connection settings for the analysis service.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub api_base: String,
    pub api_key: String,
    pub text_model: String,
    pub tts_model: String,
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
            text_model: "gemini-2.5-flash-preview-05-20".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}
