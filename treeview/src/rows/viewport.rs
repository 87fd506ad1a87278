//! The window of flat rows a renderer actually draws.

use std::ops::Range;

/// Scroll position and height over the flat row list, in rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Flat index of the first displayed row.
    offset: usize,
    /// Number of rows that fit on screen.
    height: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self { offset: 0, height }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Rows moved by PageUp/PageDown.
    pub fn page_size(&self) -> usize {
        self.height.max(1)
    }

    /// Set the height in rows (called by the renderer on resize).
    pub fn set_height(&mut self, height: usize, total: usize) {
        self.height = height;
        self.clamp(total);
    }

    /// Set the scroll offset, clamped so the last page stays full.
    pub fn set_offset(&mut self, offset: usize, total: usize) -> bool {
        let previous = self.offset;
        self.offset = offset.min(Self::max_offset(self.height, total));
        previous != self.offset
    }

    /// Keep the offset valid after the row count changed.
    pub fn clamp(&mut self, total: usize) {
        self.offset = self.offset.min(Self::max_offset(self.height, total));
    }

    /// Scroll the minimum amount needed to show `index`.
    ///
    /// Returns `true` if the offset changed.
    pub fn scroll_to(&mut self, index: usize, total: usize) -> bool {
        if index >= total || self.height == 0 {
            return false;
        }
        let previous = self.offset;
        if index < self.offset {
            self.offset = index;
        } else if index >= self.offset + self.height {
            self.offset = index + 1 - self.height;
        }
        previous != self.offset
    }

    /// Flat indices currently on screen.
    pub fn visible_range(&self, total: usize) -> Range<usize> {
        if total == 0 || self.height == 0 {
            return 0..0;
        }
        let start = self.offset.min(total);
        let end = (start + self.height).min(total);
        start..end
    }

    /// Flat index under a screen row `y` (relative to the viewport top).
    pub fn index_at(&self, y: u16, row_height: u16, total: usize) -> Option<usize> {
        let index = self.offset + (y / row_height.max(1)) as usize;
        (index < total && index < self.offset + self.height).then_some(index)
    }

    fn max_offset(height: usize, total: usize) -> usize {
        total.saturating_sub(height)
    }
}
