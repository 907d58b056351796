//! Per-scanline span storage.
//!
//! The table is sized once, to the tallest screen the renderer supports, and
//! then reused for every triangle of every frame. Resetting only touches the
//! rows the previous triangle wrote.

use std::ops::Range;

/// Horizontal pixel interval on one scanline, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: i32,
    pub end: i32,
}

impl Span {
    /// Sentinel that any real X widens.
    pub const EMPTY: Span = Span {
        start: i32::MAX,
        end: i32::MIN,
    };

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    #[inline]
    pub fn include(&mut self, x: i32) {
        self.start = self.start.min(x);
        self.end = self.end.max(x);
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[derive(Debug, Clone)]
pub struct SpanTable {
    spans: Vec<Span>,
    /// Rows usable for the current triangle, never more than `spans.len()`.
    rows: usize,
    min_y: i32,
    max_y: i32,
}

impl SpanTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            spans: vec![Span::EMPTY; capacity],
            rows: capacity,
            min_y: i32::MAX,
            max_y: i32::MIN,
        }
    }

    pub fn capacity(&self) -> usize {
        self.spans.len()
    }

    /// Number of rows edges may write for the current triangle.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Clears the rows written since the last reset and limits the next
    /// triangle to `screen_height` rows.
    pub fn reset(&mut self, screen_height: usize) {
        if let Some(touched) = self.touched() {
            let end = touched.end.min(self.spans.len());
            self.spans[touched.start..end].fill(Span::EMPTY);
        }
        self.rows = screen_height.min(self.spans.len());
        self.min_y = i32::MAX;
        self.max_y = i32::MIN;
    }

    /// Scanlines covered by the edges scanned since the last reset, `max_y`
    /// exclusive. Empty when nothing was written.
    pub fn scanlines(&self) -> Range<i32> {
        if self.min_y < self.max_y {
            self.min_y..self.max_y
        } else {
            0..0
        }
    }

    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    pub fn is_empty(&self) -> bool {
        self.scanlines().is_empty()
    }

    pub fn get(&self, y: i32) -> Option<Span> {
        usize::try_from(y).ok().and_then(|y| self.spans.get(y)).copied()
    }

    #[inline]
    pub(crate) fn widen(&mut self, y: usize, x: i32) {
        self.spans[y].include(x);
    }

    pub(crate) fn extend_bounds(&mut self, first: i32, last: i32) {
        self.min_y = self.min_y.min(first);
        self.max_y = self.max_y.max(last);
    }

    fn touched(&self) -> Option<Range<usize>> {
        let rows = self.scanlines();
        (!rows.is_empty()).then(|| rows.start.max(0) as usize..rows.end.max(0) as usize)
    }
}
