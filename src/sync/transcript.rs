//! Paragraph render model for an interactive transcript.

use super::models::{PlaybackState, TimingsData};
use super::phrases::WordPhraseIndex;
use super::tokenizer::{clean_heading, is_heading, tokenize, Token};
use serde::Serialize;

/// Default word-count bound below which a paragraph may be a heading.
pub const DEFAULT_HEADING_MAX_WORDS: usize = 10;

/// One paragraph, tokenized, with its offset into the global word list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphView {
    pub tokens: Vec<Token>,
    /// Global index of this paragraph's first timed word.
    pub start_word: usize,
    /// Number of timed words attributed to this paragraph.
    pub word_count: usize,
    pub is_heading: bool,
}

impl ParagraphView {
    /// Word tokens paired with their global word index.
    pub fn words(&self) -> impl Iterator<Item = (usize, &Token)> + '_ {
        self.tokens
            .iter()
            .filter(|t| t.is_word)
            .enumerate()
            .map(move |(i, t)| (self.start_word + i, t))
    }

    /// Reconstructed display text.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

/// How a single word should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordHighlight {
    /// Part of the phrase being read.
    Active,
    /// Already read; only reported while playing.
    Past,
    Upcoming,
    /// The text has more words than the timing data.
    Untimed,
}

/// Tokenized paragraphs for a lecture.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranscriptLayout {
    pub paragraphs: Vec<ParagraphView>,
}

impl TranscriptLayout {
    pub fn build(timings: &TimingsData, heading_max_words: usize) -> Self {
        let mut word_counts = vec![0usize; timings.paragraphs.len()];
        for timing in &timings.word_timings {
            if let Some(count) = word_counts.get_mut(timing.paragraph_index) {
                *count += 1;
            }
        }

        let mut start_word = 0;
        let paragraphs = timings
            .paragraphs
            .iter()
            .zip(word_counts)
            .map(|(text, word_count)| {
                let heading = is_heading(text, heading_max_words);
                let tokens = if heading {
                    tokenize(&clean_heading(text))
                } else {
                    tokenize(text)
                };
                let view = ParagraphView {
                    tokens,
                    start_word,
                    word_count,
                    is_heading: heading,
                };
                start_word += word_count;
                view
            })
            .collect();

        Self { paragraphs }
    }

    /// Text of each phrase, words joined by single spaces.
    pub fn phrase_texts(&self, index: &WordPhraseIndex, phrase_count: usize) -> Vec<String> {
        let mut texts = vec![String::new(); phrase_count];
        for paragraph in &self.paragraphs {
            for (word, token) in paragraph.words() {
                let Some(text) = index.phrase_of(word).and_then(|p| texts.get_mut(p)) else {
                    continue;
                };
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(&token.text);
            }
        }
        texts
    }
}

/// Classify `word` against the current playback state.
pub fn highlight(word: usize, index: &WordPhraseIndex, state: &PlaybackState) -> WordHighlight {
    let Some(phrase) = index.phrase_of(word) else {
        return WordHighlight::Untimed;
    };
    match state.active_phrase {
        Some(active) if phrase == active => WordHighlight::Active,
        Some(active) if phrase < active && state.is_playing => WordHighlight::Past,
        _ => WordHighlight::Upcoming,
    }
}
