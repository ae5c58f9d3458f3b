//! Playback-driven phrase highlighting.
//!
//! The controller is `Idle` until the audio starts playing, then `Polling`:
//! one frame request is outstanding at a time, and each frame resolves the
//! active phrase from the live audio position. Pause and end cancel the
//! request; a seek resolves the phrase immediately.

use super::models::{Phrase, PlaybackState, TimingsData};
use super::phrases::{group_phrases, PhraseConfig, WordPhraseIndex};
use super::scheduler::{FrameHandle, FrameQueue, FrameScheduler, FrameSlot};
use super::tracker::PlaybackTracker;
use crate::audio::{AudioElement, AudioEvent};
use tracing::{debug, trace};

/// Parameters for building a controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SyncOptions {
    pub phrase: PhraseConfig,
    /// Milliseconds subtracted from the audio clock before lookup.
    pub offset_ms: f64,
}

/// Whether a frame request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    Idle,
    Polling,
}

/// Derived phrase structure and playback state for one lecture.
pub struct SyncController<S: FrameScheduler = FrameQueue> {
    options: SyncOptions,
    phrases: Vec<Phrase>,
    index: WordPhraseIndex,
    tracker: PlaybackTracker,
    word_starts_ms: Vec<f64>,
    state: PlaybackState,
    frame: FrameSlot,
    scheduler: S,
    attached: bool,
}

impl<S: FrameScheduler> SyncController<S> {
    pub fn new(timings: &TimingsData, options: SyncOptions, scheduler: S) -> Self {
        let mut controller = Self {
            options,
            phrases: Vec::new(),
            index: WordPhraseIndex::default(),
            tracker: PlaybackTracker::default(),
            word_starts_ms: Vec::new(),
            state: PlaybackState::default(),
            frame: FrameSlot::default(),
            scheduler,
            attached: false,
        };
        controller.rebuild(timings);
        controller
    }

    /// Replace the timing data wholesale and reset playback state.
    ///
    /// The pending frame is cancelled first. While attached, polling resumes
    /// against the new phrases if `audio` is still playing.
    pub fn load(&mut self, timings: &TimingsData, audio: &dyn AudioElement) {
        self.frame.cancel(&mut self.scheduler);
        self.rebuild(timings);
        self.state = PlaybackState::default();
        if self.attached {
            self.attach(audio);
        }
    }

    fn rebuild(&mut self, timings: &TimingsData) {
        let words = &timings.word_timings;
        self.phrases = group_phrases(words, &self.options.phrase);
        self.index = WordPhraseIndex::build(&self.phrases, words.len());
        self.tracker = PlaybackTracker::new(&self.phrases);
        self.word_starts_ms = words.iter().map(|w| w.start_ms).collect();
        debug!(
            words = words.len(),
            phrases = self.phrases.len(),
            "Rebuilt phrase index"
        );
    }

    /// Start observing `audio`. Picks up playback that is already running.
    pub fn attach(&mut self, audio: &dyn AudioElement) -> bool {
        self.attached = true;
        if audio.is_paused() {
            return false;
        }
        let changed = self.set_playing(true);
        self.frame.schedule(&mut self.scheduler);
        changed
    }

    /// Stop observing and cancel any outstanding frame.
    pub fn detach(&mut self) {
        self.frame.cancel(&mut self.scheduler);
        self.attached = false;
    }

    /// React to an audio event. Returns whether the playback state changed.
    pub fn handle_event(&mut self, event: AudioEvent, audio: &dyn AudioElement) -> bool {
        if !self.attached {
            return false;
        }
        trace!(?event, "Sync event");

        match event {
            AudioEvent::Play => {
                let changed = self.set_playing(true);
                self.frame.schedule(&mut self.scheduler);
                changed
            }
            AudioEvent::Pause | AudioEvent::Ended => {
                self.frame.cancel(&mut self.scheduler);
                self.set_playing(false)
            }
            AudioEvent::Seeked => {
                let changed = self.resolve(audio);
                if !audio.is_paused() {
                    self.frame.schedule(&mut self.scheduler);
                }
                changed
            }
            AudioEvent::LoadedMetadata | AudioEvent::TimeUpdate => false,
        }
    }

    /// Run one frame. Stale handles are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, audio: &dyn AudioElement) -> bool {
        if !self.frame.accept(handle) {
            return false;
        }
        if audio.is_paused() {
            return false;
        }
        let changed = self.resolve(audio);
        self.frame.schedule(&mut self.scheduler);
        changed
    }

    /// Seek to the start of `word` and highlight its phrase right away.
    ///
    /// No-op when the audio is not bound or the word has no timing.
    pub fn click_word(&mut self, word: usize, audio: Option<&mut dyn AudioElement>) -> bool {
        let Some(audio) = audio else {
            return false;
        };
        let (Some(&start_ms), Some(phrase)) =
            (self.word_starts_ms.get(word), self.index.phrase_of(word))
        else {
            return false;
        };

        audio.set_current_time((start_ms + self.options.offset_ms) / 1000.0);
        debug!(word, phrase, "Seek by word");
        self.set_active(Some(phrase))
    }

    /// Look up the phrase at the current audio position. `None` never clears.
    fn resolve(&mut self, audio: &dyn AudioElement) -> bool {
        let position_ms = audio.current_time() * 1000.0 - self.options.offset_ms;
        match self.tracker.active_phrase(position_ms) {
            Some(idx) => self.set_active(Some(idx)),
            None => false,
        }
    }

    fn set_active(&mut self, phrase: Option<usize>) -> bool {
        let changed = self.state.active_phrase != phrase;
        self.state.active_phrase = phrase;
        changed
    }

    fn set_playing(&mut self, playing: bool) -> bool {
        let changed = self.state.is_playing != playing;
        self.state.is_playing = playing;
        changed
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn mode(&self) -> SyncMode {
        if self.frame.is_pending() {
            SyncMode::Polling
        } else {
            SyncMode::Idle
        }
    }

    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn word_index(&self) -> &WordPhraseIndex {
        &self.index
    }

    /// The currently active phrase, if any.
    pub fn active_phrase(&self) -> Option<&Phrase> {
        self.state.active_phrase.and_then(|i| self.phrases.get(i))
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

impl<S: FrameScheduler> Drop for SyncController<S> {
    fn drop(&mut self) {
        self.frame.cancel(&mut self.scheduler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SimulatedAudio;
    use crate::sync::models::WordTiming;
    use std::time::Duration;

    /// Two phrases: words 0..=2 from 0ms, words 3..=5 from 1000ms.
    fn timings() -> TimingsData {
        let w = |s: f64, p| WordTiming::new(s, s + 200.0, p);
        TimingsData::new(
            vec!["One two three.".into(), "Four five six.".into()],
            vec![w(0.0, 0), w(200.0, 0), w(400.0, 0), w(1000.0, 1), w(1200.0, 1), w(1400.0, 1)],
        )
    }

    fn controller() -> SyncController {
        SyncController::new(&timings(), SyncOptions::default(), FrameQueue::new())
    }

    /// Deliver queued audio events, then fire whatever frames are due.
    fn pump(ctl: &mut SyncController, audio: &mut SimulatedAudio) {
        for event in audio.drain_events() {
            ctl.handle_event(event, &*audio);
        }
        for handle in ctl.scheduler_mut().take_due() {
            ctl.on_frame(handle, &*audio);
        }
    }

    #[test]
    fn test_builds_phrases_on_construction() {
        let ctl = controller();
        assert_eq!(ctl.phrases().len(), 2);
        assert_eq!(ctl.word_index().phrase_of(4), Some(1));
        assert_eq!(ctl.state(), PlaybackState::default());
        assert_eq!(ctl.mode(), SyncMode::Idle);
    }

    #[test]
    fn test_play_starts_polling_and_tracks_position() {
        let mut ctl = controller();
        let mut audio = SimulatedAudio::new(Some(2.0));
        ctl.attach(&audio);

        audio.play();
        pump(&mut ctl, &mut audio);
        assert!(ctl.state().is_playing);
        assert_eq!(ctl.mode(), SyncMode::Polling);
        assert_eq!(ctl.state().active_phrase, Some(0));

        audio.advance(Duration::from_millis(1050));
        pump(&mut ctl, &mut audio);
        assert_eq!(ctl.state().active_phrase, Some(1));
        assert_eq!(ctl.scheduler().pending_count(), 1);
    }

    #[test]
    fn test_pause_cancels_polling() {
        let mut ctl = controller();
        let mut audio = SimulatedAudio::new(Some(2.0));
        ctl.attach(&audio);
        audio.play();
        pump(&mut ctl, &mut audio);

        audio.pause();
        pump(&mut ctl, &mut audio);
        assert!(!ctl.state().is_playing);
        assert_eq!(ctl.mode(), SyncMode::Idle);
        assert!(ctl.scheduler().is_idle());
        assert_eq!(ctl.state().active_phrase, Some(0));
    }

    #[test]
    fn test_ended_stops_polling() {
        let mut ctl = controller();
        let mut audio = SimulatedAudio::new(Some(1.6));
        ctl.attach(&audio);
        audio.play();
        pump(&mut ctl, &mut audio);

        audio.advance(Duration::from_secs(5));
        pump(&mut ctl, &mut audio);
        assert!(!ctl.state().is_playing);
        assert_eq!(ctl.mode(), SyncMode::Idle);
    }

    #[test]
    fn test_position_before_first_phrase_is_not_applied() {
        let w = WordTiming::new(500.0, 700.0, 0);
        let data = TimingsData::new(vec!["Late".into()], vec![w]);
        let mut ctl = SyncController::new(&data, SyncOptions::default(), FrameQueue::new());
        let mut audio = SimulatedAudio::new(Some(1.0));
        ctl.attach(&audio);

        audio.play();
        pump(&mut ctl, &mut audio);
        assert_eq!(ctl.state().active_phrase, None);

        ctl.click_word(0, Some(&mut audio));
        assert_eq!(ctl.state().active_phrase, Some(0));

        // Seeking back before the first phrase keeps the last highlight.
        audio.set_current_time(0.1);
        pump(&mut ctl, &mut audio);
        assert_eq!(ctl.state().active_phrase, Some(0));
    }

    #[test]
    fn test_seek_while_paused_updates_highlight() {
        let mut ctl = controller();
        let mut audio = SimulatedAudio::new(Some(2.0));
        ctl.attach(&audio);

        audio.set_current_time(1.3);
        pump(&mut ctl, &mut audio);
        assert_eq!(ctl.state().active_phrase, Some(1));
        assert_eq!(ctl.mode(), SyncMode::Idle);
    }

    #[test]
    fn test_seek_while_playing_discards_stale_frame() {
        let mut ctl = controller();
        let mut audio = SimulatedAudio::new(Some(2.0));
        ctl.attach(&audio);
        audio.play();
        pump(&mut ctl, &mut audio);

        let stale = ctl.scheduler_mut().take_due();
        audio.set_current_time(1.1);
        for event in audio.drain_events() {
            ctl.handle_event(event, &audio);
        }
        assert_eq!(ctl.state().active_phrase, Some(1));

        for handle in stale {
            assert!(!ctl.on_frame(handle, &audio));
        }
        assert_eq!(ctl.scheduler().pending_count(), 1);
    }

    #[test]
    fn test_click_word_seeks_and_highlights() {
        let mut ctl = controller();
        let mut audio = SimulatedAudio::new(Some(2.0));
        ctl.attach(&audio);

        assert!(ctl.click_word(4, Some(&mut audio)));
        assert_eq!(audio.current_time(), 1.2);
        assert_eq!(ctl.state().active_phrase, ctl.word_index().phrase_of(4));
    }

    #[test]
    fn test_click_word_without_audio_or_timing_is_noop() {
        let mut ctl = controller();
        let mut audio = SimulatedAudio::new(Some(2.0));

        assert!(!ctl.click_word(1, None));
        assert!(!ctl.click_word(99, Some(&mut audio)));
        assert_eq!(audio.current_time(), 0.0);
        assert_eq!(ctl.state().active_phrase, None);
    }

    #[test]
    fn test_offset_applies_to_lookup_and_seek() {
        let options = SyncOptions { offset_ms: 100.0, ..SyncOptions::default() };
        let mut ctl = SyncController::new(&timings(), options, FrameQueue::new());
        let mut audio = SimulatedAudio::new(Some(2.0));
        ctl.attach(&audio);

        ctl.click_word(3, Some(&mut audio));
        assert_eq!(audio.current_time(), 1.1);

        audio.set_current_time(1.05);
        pump(&mut ctl, &mut audio);
        assert_eq!(ctl.state().active_phrase, Some(0));
    }

    #[test]
    fn test_attach_picks_up_running_playback() {
        let mut ctl = controller();
        let mut audio = SimulatedAudio::new(Some(2.0));
        audio.play();
        audio.drain_events();

        ctl.attach(&audio);
        assert!(ctl.state().is_playing);
        assert_eq!(ctl.mode(), SyncMode::Polling);
    }

    #[test]
    fn test_detach_cancels_and_ignores_events() {
        let mut ctl = controller();
        let mut audio = SimulatedAudio::new(Some(2.0));
        ctl.attach(&audio);
        audio.play();
        pump(&mut ctl, &mut audio);

        ctl.detach();
        assert!(ctl.scheduler().is_idle());

        audio.set_current_time(1.5);
        pump(&mut ctl, &mut audio);
        assert_eq!(ctl.state().active_phrase, Some(0));
        assert_eq!(ctl.mode(), SyncMode::Idle);
    }

    #[test]
    fn test_load_while_paused_resets_state() {
        let mut ctl = controller();
        let mut audio = SimulatedAudio::new(Some(2.0));
        ctl.attach(&audio);
        audio.set_current_time(1.2);
        pump(&mut ctl, &mut audio);
        assert_eq!(ctl.state().active_phrase, Some(1));

        let single = TimingsData::new(vec!["Solo".into()], vec![WordTiming::new(0.0, 100.0, 0)]);
        ctl.load(&single, &audio);

        assert_eq!(ctl.state(), PlaybackState::default());
        assert_eq!(ctl.phrases().len(), 1);
        assert!(ctl.scheduler().is_idle());
        assert_eq!(ctl.mode(), SyncMode::Idle);
    }

    #[test]
    fn test_load_while_playing_keeps_tracking() {
        let mut ctl = controller();
        let mut audio = SimulatedAudio::new(Some(3.0));
        ctl.attach(&audio);
        audio.play();
        pump(&mut ctl, &mut audio);
        let before_load = ctl.scheduler_mut().take_due();

        // Same words, shifted: the second phrase now starts at 900ms.
        let w = |s: f64, p| WordTiming::new(s, s + 200.0, p);
        let shifted = TimingsData::new(
            vec!["One two three.".into(), "Four five six.".into()],
            vec![w(0.0, 0), w(200.0, 0), w(400.0, 0), w(900.0, 1), w(1100.0, 1), w(1300.0, 1)],
        );
        ctl.load(&shifted, &audio);

        assert!(ctl.state().is_playing);
        assert_eq!(ctl.state().active_phrase, None);
        assert_eq!(ctl.mode(), SyncMode::Polling);
        assert_eq!(ctl.scheduler().pending_count(), 1);
        for handle in before_load {
            assert!(!ctl.on_frame(handle, &audio));
        }

        audio.advance(Duration::from_millis(950));
        pump(&mut ctl, &mut audio);
        assert_eq!(ctl.state().active_phrase, Some(1));
        assert_eq!(ctl.mode(), SyncMode::Polling);
    }

    #[test]
    fn test_seeked_while_playing_queries_once_and_reschedules() {
        let mut ctl = controller();
        let mut audio = SimulatedAudio::new(Some(2.0));
        ctl.attach(&audio);
        audio.play();
        pump(&mut ctl, &mut audio);
        assert_eq!(ctl.state().active_phrase, Some(0));

        audio.set_current_time(1.3);
        audio.drain_events();
        assert!(ctl.handle_event(AudioEvent::Seeked, &audio));

        assert_eq!(ctl.state().active_phrase, Some(1));
        assert!(ctl.state().is_playing);
        assert_eq!(ctl.mode(), SyncMode::Polling);
        assert_eq!(ctl.scheduler().pending_count(), 1);

        let due = ctl.scheduler_mut().take_due();
        assert_eq!(due.len(), 1);
        ctl.on_frame(due[0], &audio);
        assert_eq!(ctl.state().active_phrase, Some(1));
        assert_eq!(ctl.scheduler().pending_count(), 1);
    }

    #[test]
    fn test_empty_timings() {
        let mut ctl =
            SyncController::new(&TimingsData::default(), SyncOptions::default(), FrameQueue::new());
        let mut audio = SimulatedAudio::new(Some(2.0));
        ctl.attach(&audio);
        audio.play();
        pump(&mut ctl, &mut audio);

        assert!(ctl.phrases().is_empty());
        assert_eq!(ctl.state().active_phrase, None);
        assert!(!ctl.click_word(0, Some(&mut audio)));
    }
}
