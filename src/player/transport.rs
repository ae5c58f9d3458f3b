//! Play/pause, seek, speed and skip controls over the shared audio element.
//!
//! The elapsed-time readout refreshes once per frame while playing, using the
//! same single-slot frame discipline as the sync controller.

use crate::audio::{AudioElement, AudioEvent};
use crate::sync::{FrameHandle, FrameQueue, FrameScheduler, FrameSlot};
use tracing::debug;

/// Selectable playback rates, cycled in order.
pub const SPEEDS: [f64; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

const DEFAULT_SPEED_INDEX: usize = 2;

/// Horizontal extent of a clickable progress bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressBar {
    pub left: f64,
    pub width: f64,
}

impl ProgressBar {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Fraction of the bar at `x`, clamped to `[0, 1]`. `None` for a zero-width bar.
    pub fn fraction_at(&self, x: f64) -> Option<f64> {
        if !(self.width > 0.0) {
            return None;
        }
        Some(((x - self.left) / self.width).clamp(0.0, 1.0))
    }
}

/// Transport state for one audio element.
pub struct TransportControl<S: FrameScheduler = FrameQueue> {
    playing: bool,
    current_time: f64,
    duration: Option<f64>,
    speed_index: usize,
    skip_seconds: f64,
    frame: FrameSlot,
    scheduler: S,
}

impl<S: FrameScheduler> TransportControl<S> {
    pub fn new(skip_seconds: f64, scheduler: S) -> Self {
        Self {
            playing: false,
            current_time: 0.0,
            duration: None,
            speed_index: DEFAULT_SPEED_INDEX,
            skip_seconds,
            frame: FrameSlot::default(),
            scheduler,
        }
    }

    /// Pick up the state of an already-mounted element.
    pub fn attach(&mut self, audio: &dyn AudioElement) {
        self.duration = audio.known_duration();
        self.current_time = audio.current_time();
        if !audio.is_paused() {
            self.playing = true;
            self.frame.schedule(&mut self.scheduler);
        }
    }

    /// Cancel the readout frame.
    pub fn detach(&mut self) {
        self.frame.cancel(&mut self.scheduler);
    }

    pub fn handle_event(&mut self, event: AudioEvent, audio: &dyn AudioElement) {
        match event {
            AudioEvent::Play => {
                self.playing = true;
                self.frame.schedule(&mut self.scheduler);
            }
            AudioEvent::Pause | AudioEvent::Ended => {
                self.playing = false;
                self.frame.cancel(&mut self.scheduler);
            }
            AudioEvent::LoadedMetadata => self.duration = audio.known_duration(),
            AudioEvent::TimeUpdate | AudioEvent::Seeked => self.current_time = audio.current_time(),
        }
    }

    /// Refresh the readout; stale handles are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, audio: &dyn AudioElement) {
        if !self.frame.accept(handle) || audio.is_paused() {
            return;
        }
        self.current_time = audio.current_time();
        self.frame.schedule(&mut self.scheduler);
    }

    pub fn toggle_play(&mut self, audio: Option<&mut dyn AudioElement>) {
        let Some(audio) = audio else {
            return;
        };
        if audio.is_paused() {
            audio.play();
        } else {
            audio.pause();
        }
    }

    /// Seek to the point of the bar under `x`.
    ///
    /// Does nothing until the duration is known.
    pub fn seek_click(&mut self, x: f64, bar: &ProgressBar, audio: Option<&mut dyn AudioElement>) {
        let (Some(audio), Some(duration)) = (audio, self.duration) else {
            return;
        };
        let Some(fraction) = bar.fraction_at(x) else {
            return;
        };
        self.seek_to(fraction * duration, audio);
    }

    /// Seek to a fraction of the duration, e.g. from a keyboard shortcut.
    pub fn seek_fraction(&mut self, fraction: f64, audio: Option<&mut dyn AudioElement>) {
        let (Some(audio), Some(duration)) = (audio, self.duration) else {
            return;
        };
        self.seek_to(fraction.clamp(0.0, 1.0) * duration, audio);
    }

    fn seek_to(&mut self, seconds: f64, audio: &mut dyn AudioElement) {
        audio.set_current_time(seconds);
        self.current_time = audio.current_time();
        debug!(seconds, "Seek");
    }

    /// Advance to the next speed, wrapping after the fastest.
    pub fn cycle_speed(&mut self, audio: Option<&mut dyn AudioElement>) {
        let Some(audio) = audio else {
            return;
        };
        self.speed_index = (self.speed_index + 1) % SPEEDS.len();
        audio.set_playback_rate(self.speed());
    }

    /// Move by `seconds`, clamped to `[0, duration]`.
    pub fn skip(&mut self, seconds: f64, audio: Option<&mut dyn AudioElement>) {
        let Some(audio) = audio else {
            return;
        };
        let upper = self.duration.unwrap_or(0.0);
        let target = (audio.current_time() + seconds).min(upper).max(0.0);
        self.seek_to(target, audio);
    }

    pub fn skip_back(&mut self, audio: Option<&mut dyn AudioElement>) {
        self.skip(-self.skip_seconds, audio);
    }

    pub fn skip_forward(&mut self, audio: Option<&mut dyn AudioElement>) {
        self.skip(self.skip_seconds, audio);
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn speed(&self) -> f64 {
        SPEEDS[self.speed_index]
    }

    /// Played fraction in `[0, 1]`; zero while the duration is unknown.
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(d) if d > 0.0 => (self.current_time / d).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    pub fn elapsed_label(&self) -> String {
        format_time(self.current_time)
    }

    pub fn duration_label(&self) -> String {
        match self.duration {
            Some(d) => format_time(d),
            None => "--:--".to_string(),
        }
    }

    pub fn speed_label(&self) -> String {
        format!("{}×", self.speed())
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

impl<S: FrameScheduler> Drop for TransportControl<S> {
    fn drop(&mut self) {
        self.frame.cancel(&mut self.scheduler);
    }
}

/// Format seconds as `m:ss`.
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
