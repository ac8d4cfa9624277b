use std::io::Cursor;

use attackmap_messages::SynthesisFailure;
use log::{debug, info};
use rodio::{Decoder, OutputStream, Sink};

/// Plays an encoded WAV file to completion.
pub trait AudioPlayer: Send + Sync {
    /// Blocks until playback has finished.
    fn play(&self, wav: Vec<u8>) -> Result<(), SynthesisFailure>;
}

/// Plays through the default output device.
///
/// Each call opens its own output stream and drops it once the sink drains,
/// so a finished sound holds no device resources.
#[derive(Debug, Default)]
pub struct RodioPlayer;

impl AudioPlayer for RodioPlayer {
    fn play(&self, wav: Vec<u8>) -> Result<(), SynthesisFailure> {
        let (_stream, handle) = OutputStream::try_default().map_err(playback_error)?;
        let sink = Sink::try_new(&handle).map_err(playback_error)?;
        let source = Decoder::new(Cursor::new(wav)).map_err(playback_error)?;

        info!("Playing synthesized speech");
        sink.append(source);
        sink.sleep_until_end();
        debug!("Playback finished");
        Ok(())
    }
}

fn playback_error(e: impl std::fmt::Display) -> SynthesisFailure {
    SynthesisFailure::Playback(e.to_string())
}

/// Discards audio. Used with `--mute` and on machines without an output device.
#[derive(Debug, Default)]
pub struct NullPlayer;

impl AudioPlayer for NullPlayer {
    fn play(&self, wav: Vec<u8>) -> Result<(), SynthesisFailure> {
        debug!("Muted: dropping {} bytes of audio", wav.len());
        Ok(())
    }
}
