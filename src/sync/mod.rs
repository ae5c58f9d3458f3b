//! Audio/transcript synchronization.
//!
//! Word timings are grouped into phrases once per lecture; during playback
//! the active phrase is found by binary search over phrase start times.

mod controller;
mod models;
mod phrases;
mod scheduler;
mod scroll;
mod tokenizer;
mod tracker;
mod transcript;

pub use controller::{SyncController, SyncMode, SyncOptions};
pub use models::{Phrase, PlaybackState, TimingsData, WordTiming};
pub use phrases::{
    group_phrases, PhraseConfig, WordPhraseIndex, DEFAULT_ORPHAN_MAX_WORDS, DEFAULT_PHRASE_GAP_MS,
};
pub use scheduler::{FrameHandle, FrameQueue, FrameScheduler, FrameSlot};
pub use scroll::{AutoScroll, LineViewport, Viewport};
pub use tokenizer::{clean_heading, is_heading, tokenize, Token};
pub use tracker::PlaybackTracker;
pub use transcript::{
    highlight, ParagraphView, TranscriptLayout, WordHighlight, DEFAULT_HEADING_MAX_WORDS,
};
