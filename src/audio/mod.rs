//! Audio element abstraction.
//!
//! The lecture page owns exactly one audio element. The sync controller and
//! the transport control both observe it; only transport actions and word
//! clicks write to it.

mod simulated;

pub use simulated::SimulatedAudio;

use serde::{Deserialize, Serialize};

/// Discrete notifications raised by an audio element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioEvent {
    Play,
    Pause,
    Seeked,
    Ended,
    LoadedMetadata,
    TimeUpdate,
}

/// A playable audio stream with a seekable position.
pub trait AudioElement {
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Move the playback position, in seconds.
    fn set_current_time(&mut self, seconds: f64);

    /// Total length in seconds, or `None` until metadata has loaded.
    fn duration(&self) -> Option<f64>;

    fn is_paused(&self) -> bool;

    fn play(&mut self);

    fn pause(&mut self);

    fn playback_rate(&self) -> f64;

    fn set_playback_rate(&mut self, rate: f64);

    /// Duration if it is known and non-zero.
    fn known_duration(&self) -> Option<f64> {
        self.duration().filter(|d| d.is_finite() && *d > 0.0)
    }
}
