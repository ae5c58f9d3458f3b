//! Symposium - read-along lectures by historical thinkers
//!
//! A terminal client for the Synthetic Symposium backend, built around a
//! transcript synchronization engine.
//!
//! # Overview
//!
//! Symposium allows you to:
//! - Browse thinkers, courses and lectures
//! - Ask the backend to write lectures and synthesize their narration
//! - Follow a lecture's transcript phrase by phrase as the audio plays
//! - Inspect how word timings group into phrases
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `api` - Backend records, HTTP client and the `LectureSource` trait
//! - `sync` - Tokenizer, phrase grouping, playback tracking and the sync controller
//! - `audio` - Audio element abstraction and a simulated clock
//! - `player` - Transport controls and the terminal playback session
//! - `cli` - Command line interface
//!
//! # Example
//!
//! ```rust
//! use symposium::sync::{group_phrases, PhraseConfig, PlaybackTracker, WordTiming};
//!
//! let words = vec![
//!     WordTiming::new(0.0, 300.0, 0),
//!     WordTiming::new(320.0, 600.0, 0),
//!     WordTiming::new(900.0, 1200.0, 0),
//!     WordTiming::new(1220.0, 1500.0, 0),
//!     WordTiming::new(1520.0, 1800.0, 0),
//! ];
//! let phrases = group_phrases(&words, &PhraseConfig::default());
//! assert_eq!(phrases.len(), 2);
//!
//! let tracker = PlaybackTracker::new(&phrases);
//! assert_eq!(tracker.active_phrase(950.0), Some(1));
//! ```

pub mod api;
pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod player;
pub mod sync;

pub use error::{Result, SymposiumError};
