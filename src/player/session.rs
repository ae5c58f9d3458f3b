//! A terminal playback session.
//!
//! Wires one [`SimulatedAudio`] clock to a sync controller, a transport
//! control and an auto-scrolling line viewport. The host calls
//! [`PlaybackSession::tick`] once per frame and [`PlaybackSession::apply`]
//! for each user command.

use super::transport::TransportControl;
use crate::audio::{AudioElement, AudioEvent, SimulatedAudio};
use crate::config::Settings;
use crate::sync::{
    AutoScroll, FrameQueue, LineViewport, PlaybackState, SyncController, TimingsData,
    TranscriptLayout, Viewport,
};
use std::time::Duration;
use tracing::debug;

/// A user action during playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePlay,
    SkipBack,
    SkipForward,
    CycleSpeed,
    /// Seek to a percentage of the duration.
    SeekPercent(u8),
    /// Seek to the start of a word, by global index.
    ClickWord(usize),
    Quit,
}

impl Command {
    /// Parse one line of terminal input.
    ///
    /// An empty line (or a lone space) toggles playback; a single digit
    /// seeks to that tenth of the lecture; `w <n>` jumps to word `n`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line {
            "" | "p" => return Some(Command::TogglePlay),
            "," | "b" => return Some(Command::SkipBack),
            "." | "f" => return Some(Command::SkipForward),
            "s" => return Some(Command::CycleSpeed),
            "q" => return Some(Command::Quit),
            _ => {}
        }

        if let Some(word) = line.strip_prefix('w') {
            return word.trim().parse().ok().map(Command::ClickWord);
        }
        match line.parse::<u8>() {
            Ok(tenth) if tenth <= 9 => Some(Command::SeekPercent(tenth * 10)),
            Ok(percent) if percent <= 100 => Some(Command::SeekPercent(percent)),
            _ => line
                .strip_suffix('%')
                .and_then(|p| p.parse::<u8>().ok())
                .filter(|p| *p <= 100)
                .map(Command::SeekPercent),
        }
    }
}

/// What changed during one tick or command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub phrase_changed: bool,
    pub playing_changed: bool,
    pub scrolled: bool,
    pub ended: bool,
}

/// One rendered line of the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Phrase(usize),
    Blank,
}

/// Audio, sync and transport state for one lecture.
pub struct PlaybackSession {
    audio: SimulatedAudio,
    sync: SyncController,
    transport: TransportControl,
    scroll: AutoScroll,
    viewport: LineViewport,
    lines: Vec<Line>,
    phrase_texts: Vec<String>,
}

impl PlaybackSession {
    /// Build a session for `timings`, paused at the start.
    pub fn new(timings: &TimingsData, settings: &Settings, viewport_height: usize) -> Self {
        let duration = Some(timings.duration_seconds()).filter(|d| *d > 0.0);
        let audio = SimulatedAudio::new(duration);

        let options = settings.sync.sync_options();
        let mut sync = SyncController::new(timings, options, FrameQueue::new());
        sync.attach(&audio);
        let mut transport = TransportControl::new(settings.player.skip_seconds, FrameQueue::new());
        transport.attach(&audio);

        let layout = TranscriptLayout::build(timings, settings.sync.heading_max_words);
        let phrase_texts = layout.phrase_texts(sync.word_index(), sync.phrases().len());

        // One line per phrase, with a blank line between paragraphs.
        let mut lines = Vec::new();
        let mut phrase_lines = Vec::with_capacity(phrase_texts.len());
        let mut last_paragraph = None;
        for (i, phrase) in sync.phrases().iter().enumerate() {
            let paragraph = timings.word_timings.get(phrase.start_word).map(|w| w.paragraph_index);
            if last_paragraph.is_some() && paragraph != last_paragraph {
                lines.push(Line::Blank);
            }
            last_paragraph = paragraph;
            phrase_lines.push((lines.len(), lines.len()));
            lines.push(Line::Phrase(i));
        }

        let mut viewport = LineViewport::new(viewport_height);
        viewport.set_layout(phrase_lines, lines.len());

        debug!(
            phrases = phrase_texts.len(),
            lines = lines.len(),
            duration = ?duration,
            "Playback session ready"
        );

        Self {
            audio,
            sync,
            transport,
            scroll: AutoScroll::new(),
            viewport,
            lines,
            phrase_texts,
        }
    }

    /// Advance the clock by one frame and deliver what it raised.
    pub fn tick(&mut self, elapsed: Duration) -> SessionUpdate {
        let before = self.sync.state();
        self.audio.advance(elapsed);
        self.deliver(before)
    }

    /// Apply a user command. `Quit` is left to the host.
    pub fn apply(&mut self, command: Command) -> SessionUpdate {
        let before = self.sync.state();
        match command {
            Command::TogglePlay => self.transport.toggle_play(Some(&mut self.audio)),
            Command::SkipBack => self.transport.skip_back(Some(&mut self.audio)),
            Command::SkipForward => self.transport.skip_forward(Some(&mut self.audio)),
            Command::CycleSpeed => self.transport.cycle_speed(Some(&mut self.audio)),
            Command::SeekPercent(percent) => self
                .transport
                .seek_fraction(f64::from(percent) / 100.0, Some(&mut self.audio)),
            Command::ClickWord(word) => {
                self.sync.click_word(word, Some(&mut self.audio));
            }
            Command::Quit => {}
        }
        self.deliver(before)
    }

    fn deliver(&mut self, before: PlaybackState) -> SessionUpdate {
        let mut update = SessionUpdate::default();

        for event in self.audio.drain_events() {
            self.sync.handle_event(event, &self.audio);
            self.transport.handle_event(event, &self.audio);
            update.ended |= event == AudioEvent::Ended;
        }
        for handle in self.sync.scheduler_mut().take_due() {
            self.sync.on_frame(handle, &self.audio);
        }
        for handle in self.transport.scheduler_mut().take_due() {
            self.transport.on_frame(handle, &self.audio);
        }

        let after = self.sync.state();
        update.phrase_changed = after.active_phrase != before.active_phrase;
        update.playing_changed = after.is_playing != before.is_playing;
        update.scrolled = self.scroll.follow(&after, &mut self.viewport);
        update
    }

    /// Change the number of transcript lines on screen.
    ///
    /// Keeps the active phrase in view. Returns whether the height changed.
    pub fn resize(&mut self, height: usize) -> bool {
        let height = height.max(1);
        if height == self.viewport.height() {
            return false;
        }
        self.viewport.set_height(height);
        if let Some(active) = self.sync.state().active_phrase {
            if !self.viewport.is_phrase_visible(active) {
                self.viewport.scroll_to_center(active);
            }
        }
        debug!(height, top = self.viewport.top(), "Viewport resized");
        true
    }

    /// Stop both controllers. The session is inert afterwards.
    pub fn close(&mut self) {
        if !self.audio.is_paused() {
            let before = self.sync.state();
            self.audio.pause();
            self.deliver(before);
        }
        self.sync.detach();
        self.transport.detach();
    }

    pub fn sync(&self) -> &SyncController {
        &self.sync
    }

    pub fn transport(&self) -> &TransportControl {
        &self.transport
    }

    pub fn audio(&self) -> &SimulatedAudio {
        &self.audio
    }

    pub fn viewport(&self) -> &LineViewport {
        &self.viewport
    }

    /// Lines currently inside the viewport.
    pub fn visible(&self) -> &[Line] {
        let range = self.viewport.visible_lines();
        &self.lines[range.start.min(self.lines.len())..range.end.min(self.lines.len())]
    }

    pub fn phrase_text(&self, phrase: usize) -> &str {
        self.phrase_texts.get(phrase).map(String::as_str).unwrap_or("")
    }

    /// Whether a phrase is on screen.
    pub fn is_visible(&self, phrase: usize) -> bool {
        self.viewport.is_phrase_visible(phrase)
    }

    pub fn is_ended(&self) -> bool {
        self.audio.is_ended()
    }
}
