//! Active-phrase resolution from a playback position.

use super::models::Phrase;

/// Binary search over precomputed phrase start times.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackTracker {
    starts_ms: Vec<f64>,
}

impl PlaybackTracker {
    /// Cache the start times of `phrases`, which are ascending by construction.
    pub fn new(phrases: &[Phrase]) -> Self {
        Self {
            starts_ms: phrases.iter().map(|p| p.start_ms).collect(),
        }
    }

    /// Index of the last phrase whose start is at or before `position_ms`.
    ///
    /// Returns `None` before the first phrase, for an empty phrase list, and
    /// for a NaN position.
    pub fn active_phrase(&self, position_ms: f64) -> Option<usize> {
        let started = self.starts_ms.partition_point(|&start| start <= position_ms);
        started.checked_sub(1)
    }

    pub fn phrase_count(&self) -> usize {
        self.starts_ms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(starts: &[f64]) -> PlaybackTracker {
        let phrases: Vec<Phrase> = starts
            .iter()
            .enumerate()
            .map(|(i, &start_ms)| Phrase { start_word: i, end_word: i, start_ms })
            .collect();
        PlaybackTracker::new(&phrases)
    }

    fn linear(starts: &[f64], t: f64) -> Option<usize> {
        starts.iter().rposition(|&s| s <= t)
    }

    #[test]
    fn test_position_inside_second_phrase() {
        assert_eq!(tracker(&[0.0, 900.0]).active_phrase(950.0), Some(1));
    }

    #[test]
    fn test_before_first_phrase() {
        let t = tracker(&[200.0, 900.0]);
        assert_eq!(t.active_phrase(0.0), None);
        assert_eq!(t.active_phrase(199.9), None);
        assert_eq!(t.active_phrase(200.0), Some(0));
    }

    #[test]
    fn test_empty_phrase_list() {
        assert_eq!(tracker(&[]).active_phrase(1000.0), None);
    }

    #[test]
    fn test_nan_position() {
        assert_eq!(tracker(&[0.0, 10.0]).active_phrase(f64::NAN), None);
    }

    #[test]
    fn test_matches_linear_scan() {
        let sets: [&[f64]; 4] = [
            &[0.0],
            &[0.0, 900.0],
            &[100.0, 250.0, 250.5, 4000.0, 4001.0, 9000.0],
            &[5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0],
        ];
        for starts in sets {
            let t = tracker(starts);
            let mut probe = -50.0;
            while probe < 10_000.0 {
                assert_eq!(t.active_phrase(probe), linear(starts, probe), "t={}", probe);
                probe += 12.5;
            }
            for &s in starts {
                assert_eq!(t.active_phrase(s), linear(starts, s));
            }
        }
    }
}
