//! Phrase grouping over word timings.
//!
//! Words are first split into groups at silences longer than the gap
//! threshold and at paragraph changes. Short orphan groups are then folded
//! into the preceding phrase as long as that does not cross a paragraph.

use super::models::{Phrase, WordTiming};
use serde::{Deserialize, Serialize};

/// Default silence gap (ms) that starts a new phrase.
pub const DEFAULT_PHRASE_GAP_MS: f64 = 80.0;

/// Default upper bound (inclusive) on the size of an orphan group.
pub const DEFAULT_ORPHAN_MAX_WORDS: usize = 2;

/// Parameters for phrase grouping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhraseConfig {
    /// A gap strictly greater than this starts a new phrase.
    pub gap_ms: f64,
    /// Groups of at most this many words are merged into their predecessor.
    pub orphan_max_words: usize,
}

impl Default for PhraseConfig {
    fn default() -> Self {
        Self {
            gap_ms: DEFAULT_PHRASE_GAP_MS,
            orphan_max_words: DEFAULT_ORPHAN_MAX_WORDS,
        }
    }
}

/// Partition `timings` into phrases.
///
/// The result covers every word exactly once, in order.
pub fn group_phrases(timings: &[WordTiming], config: &PhraseConfig) -> Vec<Phrase> {
    if timings.is_empty() {
        return Vec::new();
    }

    let groups = split_groups(timings, config.gap_ms);

    let mut merged: Vec<Phrase> = Vec::with_capacity(groups.len());
    for group in groups {
        match merged.last_mut() {
            Some(prev)
                if group.word_count() <= config.orphan_max_words
                    && timings[prev.end_word].paragraph_index
                        == timings[group.start_word].paragraph_index =>
            {
                prev.end_word = group.end_word;
            }
            _ => merged.push(group),
        }
    }

    merged
}

/// Initial grouping at gaps and paragraph changes.
fn split_groups(timings: &[WordTiming], gap_ms: f64) -> Vec<Phrase> {
    let mut groups = Vec::new();
    let mut group_start = 0;

    for (i, pair) in timings.windows(2).enumerate() {
        let (prev, curr) = (&pair[0], &pair[1]);
        let gap = curr.start_ms - prev.end_ms;
        if gap > gap_ms || curr.paragraph_index != prev.paragraph_index {
            groups.push(phrase(timings, group_start, i));
            group_start = i + 1;
        }
    }
    groups.push(phrase(timings, group_start, timings.len() - 1));

    groups
}

fn phrase(timings: &[WordTiming], start_word: usize, end_word: usize) -> Phrase {
    Phrase {
        start_word,
        end_word,
        start_ms: timings[start_word].start_ms,
    }
}

/// Dense map from global word index to phrase index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordPhraseIndex {
    phrase_of_word: Vec<usize>,
}

impl WordPhraseIndex {
    /// Build the index for `word_count` words.
    ///
    /// Words not covered by any phrase map to phrase 0, which only happens
    /// when `phrases` was built from different timings.
    pub fn build(phrases: &[Phrase], word_count: usize) -> Self {
        let mut phrase_of_word = vec![0; word_count];
        for (phrase_idx, phrase) in phrases.iter().enumerate() {
            let end = (phrase.end_word + 1).min(word_count);
            if phrase.start_word < end {
                phrase_of_word[phrase.start_word..end].fill(phrase_idx);
            }
        }
        Self { phrase_of_word }
    }

    /// Phrase containing `word`, or `None` past the end of the transcript.
    pub fn phrase_of(&self, word: usize) -> Option<usize> {
        self.phrase_of_word.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.phrase_of_word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrase_of_word.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(s: f64, e: f64, p: usize) -> WordTiming {
        WordTiming::new(s, e, p)
    }

    fn ranges(phrases: &[Phrase]) -> Vec<(usize, usize)> {
        phrases.iter().map(|p| (p.start_word, p.end_word)).collect()
    }

    /// Evenly spaced words with the given paragraph indices and gaps.
    fn spaced(paragraphs: &[usize], gaps: &[f64]) -> Vec<WordTiming> {
        let mut out = Vec::new();
        let mut t = 0.0;
        for (i, &p) in paragraphs.iter().enumerate() {
            if i > 0 {
                t += gaps[i - 1];
            }
            out.push(w(t, t + 200.0, p));
            t += 200.0;
        }
        out
    }

    #[test]
    fn test_empty_input() {
        assert!(group_phrases(&[], &PhraseConfig::default()).is_empty());
    }

    #[test]
    fn test_single_word() {
        let phrases = group_phrases(&[w(120.0, 400.0, 0)], &PhraseConfig::default());
        assert_eq!(ranges(&phrases), vec![(0, 0)]);
        assert_eq!(phrases[0].start_ms, 120.0);
    }

    #[test]
    fn test_trailing_orphan_merges_into_previous() {
        let timings = [w(0.0, 300.0, 0), w(350.0, 600.0, 0), w(900.0, 1100.0, 0)];
        let phrases = group_phrases(&timings, &PhraseConfig::default());

        assert_eq!(ranges(&phrases), vec![(0, 2)]);
        assert_eq!(phrases[0].start_ms, 0.0);
    }

    #[test]
    fn test_gap_threshold_is_strict() {
        // Three-word groups so the orphan merge does not hide the boundary.
        let exact = spaced(&[0; 6], &[0.0, 0.0, 80.0, 0.0, 0.0]);
        assert_eq!(ranges(&group_phrases(&exact, &PhraseConfig::default())), vec![(0, 5)]);

        let over = spaced(&[0; 6], &[0.0, 0.0, 81.0, 0.0, 0.0]);
        let phrases = group_phrases(&over, &PhraseConfig::default());
        assert_eq!(ranges(&phrases), vec![(0, 2), (3, 5)]);
        assert_eq!(phrases[1].start_ms, over[3].start_ms);
    }

    #[test]
    fn test_orphan_at_paragraph_boundary_stays_standalone() {
        let timings = spaced(&[0, 0, 0, 1], &[0.0, 0.0, 0.0]);
        let phrases = group_phrases(&timings, &PhraseConfig::default());
        assert_eq!(ranges(&phrases), vec![(0, 2), (3, 3)]);
    }

    #[test]
    fn test_orphans_chain_into_same_phrase() {
        // Groups: [0..2], [3], [4,5], [6..8]
        let timings = spaced(&[0; 9], &[0.0, 0.0, 200.0, 200.0, 0.0, 200.0, 0.0, 0.0]);
        let phrases = group_phrases(&timings, &PhraseConfig::default());
        assert_eq!(ranges(&phrases), vec![(0, 5), (6, 8)]);
    }

    #[test]
    fn test_leading_orphan_is_kept_as_seed() {
        let timings = spaced(&[0; 4], &[500.0, 0.0, 0.0]);
        let phrases = group_phrases(&timings, &PhraseConfig::default());
        assert_eq!(ranges(&phrases), vec![(0, 0), (1, 3)]);
    }

    #[test]
    fn test_configurable_thresholds() {
        let timings = spaced(&[0; 4], &[0.0, 100.0, 0.0]);
        let loose = PhraseConfig { gap_ms: 150.0, orphan_max_words: 2 };
        assert_eq!(ranges(&group_phrases(&timings, &loose)), vec![(0, 3)]);

        let no_merge = PhraseConfig { gap_ms: 80.0, orphan_max_words: 0 };
        assert_eq!(ranges(&group_phrases(&timings, &no_merge)), vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_phrases_partition_all_words() {
        let cases: Vec<Vec<WordTiming>> = vec![
            spaced(
                &[0, 0, 1, 1, 1, 2, 2, 2, 2, 3],
                &[10.0, 90.0, 0.0, 300.0, 0.0, 0.0, 81.0, 80.0, 5.0],
            ),
            spaced(&[0, 1, 2, 3, 4], &[0.0; 4]),
            spaced(&[0; 12], &[100.0; 11]),
        ];

        for timings in cases {
            let phrases = group_phrases(&timings, &PhraseConfig::default());
            assert_eq!(phrases[0].start_word, 0);
            assert_eq!(phrases.last().unwrap().end_word, timings.len() - 1);
            for pair in phrases.windows(2) {
                assert_eq!(pair[1].start_word, pair[0].end_word + 1);
            }
            for p in &phrases {
                assert!(p.start_word <= p.end_word);
                assert_eq!(p.start_ms, timings[p.start_word].start_ms);
            }
        }
    }

    #[test]
    fn test_word_phrase_index() {
        let timings = spaced(&[0, 0, 0, 1, 1, 1], &[0.0; 5]);
        let phrases = group_phrases(&timings, &PhraseConfig::default());
        let index = WordPhraseIndex::build(&phrases, timings.len());

        assert_eq!(index.len(), 6);
        assert_eq!(index.phrase_of(0), Some(0));
        assert_eq!(index.phrase_of(2), Some(0));
        assert_eq!(index.phrase_of(3), Some(1));
        assert_eq!(index.phrase_of(5), Some(1));
        assert_eq!(index.phrase_of(6), None);
    }

    #[test]
    fn test_index_agrees_with_phrase_ranges() {
        let timings = spaced(&[0, 0, 1, 1, 1, 2, 2], &[0.0, 0.0, 200.0, 0.0, 0.0, 0.0]);
        let phrases = group_phrases(&timings, &PhraseConfig::default());
        let index = WordPhraseIndex::build(&phrases, timings.len());

        for word in 0..timings.len() {
            let p = index.phrase_of(word).unwrap();
            assert!(phrases[p].contains(word));
        }
    }
}
