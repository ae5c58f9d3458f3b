//! Data models for transcript synchronization.

use serde::{Deserialize, Serialize};

/// Timing of a single spoken word.
///
/// Serialized with the backend's compact keys: `{"s": 0, "e": 300, "p": 0}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    /// Start time in milliseconds.
    #[serde(rename = "s")]
    pub start_ms: f64,
    /// End time in milliseconds.
    #[serde(rename = "e")]
    pub end_ms: f64,
    /// Index of the paragraph this word belongs to.
    #[serde(rename = "p")]
    pub paragraph_index: usize,
}

impl WordTiming {
    pub fn new(start_ms: f64, end_ms: f64, paragraph_index: usize) -> Self {
        Self {
            start_ms,
            end_ms,
            paragraph_index,
        }
    }
}

/// Paragraph text plus word-level timings for one lecture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingsData {
    /// Paragraph texts, in reading order.
    #[serde(rename = "p")]
    pub paragraphs: Vec<String>,
    /// One entry per spoken word, in transcript order.
    #[serde(rename = "w")]
    pub word_timings: Vec<WordTiming>,
}

impl TimingsData {
    pub fn new(paragraphs: Vec<String>, word_timings: Vec<WordTiming>) -> Self {
        Self {
            paragraphs,
            word_timings,
        }
    }

    /// Whether there is anything to synchronize against.
    pub fn is_syncable(&self) -> bool {
        !self.word_timings.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.word_timings.len()
    }

    /// Audio length implied by the last word, in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.word_timings.last().map(|w| w.end_ms / 1000.0).unwrap_or(0.0)
    }
}

/// A contiguous run of words highlighted as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phrase {
    /// First word index (global).
    pub start_word: usize,
    /// Last word index (global), inclusive.
    pub end_word: usize,
    /// Audio start time of the first word, in milliseconds.
    pub start_ms: f64,
}

impl Phrase {
    /// Number of words in this phrase.
    pub fn word_count(&self) -> usize {
        self.end_word - self.start_word + 1
    }

    pub fn contains(&self, word: usize) -> bool {
        (self.start_word..=self.end_word).contains(&word)
    }
}

/// UI state mutated by the sync controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackState {
    /// Phrase currently being read aloud, if any.
    pub active_phrase: Option<usize>,
    pub is_playing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timings_wire_format() {
        let json = r#"{"p":["Hello world."],"w":[{"s":0,"e":300,"p":0},{"s":350,"e":600,"p":0}]}"#;
        let data: TimingsData = serde_json::from_str(json).unwrap();

        assert_eq!(data.paragraphs, vec!["Hello world."]);
        assert_eq!(data.word_timings[1], WordTiming::new(350.0, 600.0, 0));
        assert!(data.is_syncable());
        assert_eq!(data.duration_seconds(), 0.6);
    }

    #[test]
    fn test_empty_timings_not_syncable() {
        let data: TimingsData = serde_json::from_str(r#"{"p":["Text"],"w":[]}"#).unwrap();
        assert!(!data.is_syncable());
        assert_eq!(data.duration_seconds(), 0.0);
    }
}
