use async_trait::async_trait;
use attackmap_messages::{AnalysisFailure, SynthesisFailure};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AnalysisClient, ExplainRequest, InlineAudio, RemoteConfig, SpeechRequest};

/// Explanation used when the service answers without any text.
pub const NO_EXPLANATION: &str = "No explanation available.";

/// Client for the `generateContent` endpoint of the Gemini API.
pub struct GeminiClient {
    client: Client,
    config: RemoteConfig,
}

/// Failure of one `generateContent` round trip, before it is attributed
/// to explanation or synthesis.
#[derive(Debug)]
enum CallError {
    Network(String),
    Status(u16),
    InvalidBody(String),
}

impl From<CallError> for AnalysisFailure {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Network(msg) => AnalysisFailure::Network(msg),
            CallError::Status(code) => AnalysisFailure::Status(code),
            CallError::InvalidBody(msg) => AnalysisFailure::InvalidBody(msg),
        }
    }
}

impl From<CallError> for SynthesisFailure {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Network(msg) => SynthesisFailure::Network(msg),
            CallError::Status(code) => SynthesisFailure::Status(code),
            CallError::InvalidBody(msg) => SynthesisFailure::InvalidBody(msg),
        }
    }
}

impl GeminiClient {
    pub fn new(config: RemoteConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("AttackMap/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            model
        )
    }

    async fn generate(
        &self,
        model: &str,
        payload: &GenerateRequest<'_>,
    ) -> Result<GenerateResponse, CallError> {
        debug!("POST generateContent for model {}", model);
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| CallError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CallError::Status(status.as_u16()));
        }

        response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| CallError::InvalidBody(e.to_string()))
    }
}

#[async_trait]
impl AnalysisClient for GeminiClient {
    async fn explain(&self, request: &ExplainRequest) -> Result<String, AnalysisFailure> {
        let payload = GenerateRequest {
            system_instruction: Some(Content::text(&request.system_instruction)),
            contents: vec![Content::text(&request.user_query)],
            generation_config: None,
        };
        let response = self.generate(&self.config.text_model, &payload).await?;
        Ok(explanation_text(&response))
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<InlineAudio, SynthesisFailure> {
        let payload = GenerateRequest {
            system_instruction: None,
            contents: vec![Content::text(&request.text)],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["AUDIO"],
            }),
        };
        let response = self.generate(&self.config.tts_model, &payload).await?;
        inline_audio(response).ok_or(SynthesisFailure::MissingAudio)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<TextPart<'a>>,
}

impl<'a> Content<'a> {
    fn text(text: &'a str) -> Self {
        Self {
            parts: vec![TextPart { text }],
        }
    }
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

// Every field is optional so a partial response degrades to defaults
// instead of failing to parse.
#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: Option<String>,
}

impl GenerateResponse {
    fn first_part(&self) -> Option<&ResponsePart> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .first()
    }
}

/// `candidates[0].content.parts[0].text`, or [`NO_EXPLANATION`].
fn explanation_text(response: &GenerateResponse) -> String {
    response
        .first_part()
        .and_then(|part| part.text.as_deref())
        .filter(|text| !text.is_empty())
        .unwrap_or(NO_EXPLANATION)
        .to_string()
}

/// `candidates[0].content.parts[0].inlineData` when both fields are present and non-empty.
fn inline_audio(response: GenerateResponse) -> Option<InlineAudio> {
    let mut parts = response.candidates?.into_iter().next()?.content?.parts?;
    if parts.is_empty() {
        return None;
    }
    let inline = parts.swap_remove(0).inline_data?;
    Some(InlineAudio {
        mime_type: inline.mime_type.filter(|mime_type| !mime_type.is_empty())?,
        data: inline.data.filter(|data| !data.trim().is_empty())?,
    })
}
