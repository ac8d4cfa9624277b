mod attack;
mod command;
mod event;
mod failure;
mod feed;
mod flags;
mod session;
mod units;

pub use attack::{AttackEvent, AttackType, Endpoint, HexColor};
pub use command::Command;
pub use event::Event;
pub use failure::{AnalysisFailure, SynthesisFailure};
pub use feed::{FeedConfig, TransportStatus};
pub use flags::{FALLBACK_FLAG, FlagResolver, REGIONAL_INDICATOR_OFFSET};
pub use session::SessionId;
pub use units::Hertz;
