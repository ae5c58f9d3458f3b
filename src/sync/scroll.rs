//! Keep the active phrase inside the visible part of the transcript.

use super::models::PlaybackState;

/// A scrollable region that renders the transcript.
pub trait Viewport {
    /// Whether the phrase is entirely within the visible area.
    fn is_phrase_visible(&self, phrase: usize) -> bool;

    /// Smoothly scroll so the phrase sits in the vertical center.
    fn scroll_to_center(&mut self, phrase: usize);
}

/// Scrolls the viewport when the active phrase changes during playback.
#[derive(Debug, Default)]
pub struct AutoScroll {
    last_followed: Option<usize>,
}

impl AutoScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow the active phrase. Returns whether a scroll was issued.
    pub fn follow(&mut self, state: &PlaybackState, viewport: &mut dyn Viewport) -> bool {
        if !state.is_playing {
            return false;
        }
        let Some(active) = state.active_phrase else {
            return false;
        };
        if self.last_followed == Some(active) {
            return false;
        }
        self.last_followed = Some(active);

        if viewport.is_phrase_visible(active) {
            return false;
        }
        viewport.scroll_to_center(active);
        true
    }
}

/// Line-addressed viewport for text terminals.
///
/// Each phrase occupies a range of rendered lines; the window shows
/// `height` lines starting at `top`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineViewport {
    phrase_lines: Vec<(usize, usize)>,
    total_lines: usize,
    height: usize,
    top: usize,
}

impl LineViewport {
    pub fn new(height: usize) -> Self {
        Self {
            phrase_lines: Vec::new(),
            total_lines: 0,
            height: height.max(1),
            top: 0,
        }
    }

    /// Record where each phrase was laid out: `(first_line, last_line)`, inclusive.
    pub fn set_layout(&mut self, phrase_lines: Vec<(usize, usize)>, total_lines: usize) {
        self.phrase_lines = phrase_lines;
        self.total_lines = total_lines;
        self.top = self.top.min(self.max_top());
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
        self.top = self.top.min(self.max_top());
    }

    /// First visible line.
    pub fn top(&self) -> usize {
        self.top
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Visible line range, end exclusive.
    pub fn visible_lines(&self) -> std::ops::Range<usize> {
        self.top..(self.top + self.height).min(self.total_lines.max(self.top))
    }

    fn max_top(&self) -> usize {
        self.total_lines.saturating_sub(self.height)
    }
}

impl Viewport for LineViewport {
    fn is_phrase_visible(&self, phrase: usize) -> bool {
        match self.phrase_lines.get(phrase) {
            Some(&(first, last)) => first >= self.top && last < self.top + self.height,
            None => true,
        }
    }

    fn scroll_to_center(&mut self, phrase: usize) {
        if let Some(&(first, last)) = self.phrase_lines.get(phrase) {
            let middle = first + (last - first) / 2;
            self.top = middle.saturating_sub(self.height / 2).min(self.max_top());
        }
    }
}
