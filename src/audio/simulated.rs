//! Clock-driven audio element for terminal playback and tests.

use super::{AudioElement, AudioEvent};
use std::collections::VecDeque;
use std::time::Duration;

/// An audio element that advances by wall-clock steps instead of decoding.
///
/// Events are queued in the order a media element would raise them and are
/// delivered by the host through [`SimulatedAudio::drain_events`].
#[derive(Debug)]
pub struct SimulatedAudio {
    position: f64,
    duration: Option<f64>,
    paused: bool,
    rate: f64,
    events: VecDeque<AudioEvent>,
}

impl SimulatedAudio {
    /// Create a paused element; metadata is reported immediately when `duration` is known.
    pub fn new(duration: Option<f64>) -> Self {
        let mut audio = Self {
            position: 0.0,
            duration: None,
            paused: true,
            rate: 1.0,
            events: VecDeque::new(),
        };
        if let Some(d) = duration {
            audio.load_metadata(d);
        }
        audio
    }

    /// Report the stream length, as a loaded-metadata notification would.
    pub fn load_metadata(&mut self, duration: f64) {
        self.duration = Some(duration);
        self.events.push_back(AudioEvent::LoadedMetadata);
    }

    /// Advance the clock by `elapsed` of wall time, scaled by the playback rate.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.paused {
            return;
        }

        self.position += elapsed.as_secs_f64() * self.rate;
        self.events.push_back(AudioEvent::TimeUpdate);

        if let Some(duration) = self.duration {
            if self.position >= duration {
                self.position = duration;
                self.paused = true;
                self.events.push_back(AudioEvent::Pause);
                self.events.push_back(AudioEvent::Ended);
            }
        }
    }

    /// Take all queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<AudioEvent> {
        self.events.drain(..).collect()
    }

    pub fn is_ended(&self) -> bool {
        self.duration.is_some_and(|d| self.position >= d)
    }
}

impl AudioElement for SimulatedAudio {
    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        let upper = self.duration.unwrap_or(f64::INFINITY);
        self.position = seconds.clamp(0.0, upper);
        self.events.push_back(AudioEvent::Seeked);
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) {
        if !self.paused {
            return;
        }
        if self.is_ended() {
            self.position = 0.0;
        }
        self.paused = false;
        self.events.push_back(AudioEvent::Play);
    }

    fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.events.push_back(AudioEvent::Pause);
    }

    fn playback_rate(&self) -> f64 {
        self.rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.rate = rate;
    }
}
