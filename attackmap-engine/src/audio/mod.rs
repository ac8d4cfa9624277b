pub mod pcm;
pub mod player;
pub mod wav;

pub use pcm::{PcmAudio, decode_inline_audio, parse_sample_rate};
pub use player::{AudioPlayer, NullPlayer, RodioPlayer};
pub use wav::{WAV_HEADER_LEN, encode};
