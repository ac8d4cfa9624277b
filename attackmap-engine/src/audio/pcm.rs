use std::sync::LazyLock;

use attackmap_messages::{Hertz, SynthesisFailure};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;

use crate::remote::InlineAudio;

static SAMPLE_RATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"rate=(\d+)").expect("sample rate pattern is valid"));

/// Highest rate whose byte rate still fits the 32-bit WAV header field.
pub const MAX_SAMPLE_RATE: u32 = u32::MAX / 2;

/// Raw mono 16-bit PCM as returned by the speech service.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmAudio {
    pub samples: Vec<i16>,
    pub sample_rate: Hertz,
}

impl PcmAudio {
    pub fn to_wav(&self) -> Result<Vec<u8>, SynthesisFailure> {
        super::wav::encode(&self.samples, self.sample_rate)
    }
}

/// Extract the sample rate from a format string like `audio/L16;codec=pcm;rate=24000`.
///
/// Zero and rates above [`MAX_SAMPLE_RATE`] count as missing.
pub fn parse_sample_rate(mime_type: &str) -> Option<Hertz> {
    let captures = SAMPLE_RATE.captures(mime_type)?;
    let rate: u32 = captures[1].parse().ok()?;
    (1..=MAX_SAMPLE_RATE).contains(&rate).then_some(Hertz(rate))
}

/// Reinterpret little-endian bytes as 16-bit samples.
fn samples_from_le_bytes(bytes: &[u8]) -> Result<Vec<i16>, SynthesisFailure> {
    if bytes.len() % 2 != 0 {
        return Err(SynthesisFailure::MalformedPayload(format!(
            "{} bytes is not a whole number of 16-bit samples",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Turn the speech service's inline audio into PCM samples.
pub fn decode_inline_audio(audio: &InlineAudio) -> Result<PcmAudio, SynthesisFailure> {
    if !audio.mime_type.starts_with("audio/") {
        return Err(SynthesisFailure::NotAudio(audio.mime_type.clone()));
    }
    let sample_rate = parse_sample_rate(&audio.mime_type)
        .ok_or_else(|| SynthesisFailure::MalformedFormat(audio.mime_type.clone()))?;

    let bytes = STANDARD
        .decode(audio.data.trim())
        .map_err(|e| SynthesisFailure::MalformedPayload(e.to_string()))?;

    Ok(PcmAudio {
        samples: samples_from_le_bytes(&bytes)?,
        sample_rate,
    })
}
