use attackmap_messages::{Hertz, SynthesisFailure};

/// Size of the RIFF/WAVE header written by [`encode`].
pub const WAV_HEADER_LEN: usize = 44;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BLOCK_ALIGN: u16 = CHANNELS * BITS_PER_SAMPLE / 8;
const PCM_FORMAT: u16 = 1;
const FMT_CHUNK_LEN: u32 = 16;

/// Wrap mono 16-bit PCM samples in a playable WAV container.
///
/// The output is a fixed 44-byte header followed by the samples as
/// little-endian bytes. A zero sample rate is a caller error; the header is
/// still written but no player will accept it. Inputs whose sizes don't fit
/// the 32-bit header fields are rejected.
pub fn encode(samples: &[i16], sample_rate: Hertz) -> Result<Vec<u8>, SynthesisFailure> {
    let byte_rate = sample_rate
        .as_hz()
        .checked_mul(u32::from(BLOCK_ALIGN))
        .ok_or_else(|| SynthesisFailure::MalformedFormat(format!("{sample_rate} is too high")))?;
    let (data_len, riff_len) = samples
        .len()
        .checked_mul(usize::from(BLOCK_ALIGN))
        .and_then(|len| u32::try_from(len).ok())
        .and_then(|len| Some((len, len.checked_add(36)?)))
        .ok_or_else(|| {
            SynthesisFailure::MalformedPayload(format!(
                "{} samples do not fit in a WAV file",
                samples.len()
            ))
        })?;

    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + data_len as usize);

    // RIFF chunk descriptor
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&riff_len.to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // "fmt " sub-chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    wav.extend_from_slice(&PCM_FORMAT.to_le_bytes());
    wav.extend_from_slice(&CHANNELS.to_le_bytes());
    wav.extend_from_slice(&sample_rate.as_hz().to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&BLOCK_ALIGN.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // "data" sub-chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    debug_assert_eq!(wav.len(), WAV_HEADER_LEN);

    for sample in samples {
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    Ok(wav)
}
