//! Audio transport controls and the terminal playback session.

mod session;
mod transport;

pub use session::{Command, Line, PlaybackSession, SessionUpdate};
pub use transport::{format_time, ProgressBar, TransportControl, SPEEDS};
