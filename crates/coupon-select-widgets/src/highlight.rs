//! Keyboard highlight over the rows of the open list.
//!
//! Tracks which row Enter would act on and how far the visible window is
//! scrolled. Movement wraps at both ends.

#[derive(Debug, Clone)]
pub struct Highlight {
    index: usize,
    offset: usize,
    count: usize,
    visible: usize,
}

impl Highlight {
    pub fn new(visible: usize) -> Self {
        Self {
            index: 0,
            offset: 0,
            count: 0,
            visible: visible.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// First row inside the visible window.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    /// Adopt a new row count, keeping the highlight in range.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        if count == 0 {
            self.index = 0;
            self.offset = 0;
        } else if self.index >= count {
            self.index = count - 1;
        }
        self.scroll_into_view();
    }

    pub fn set_visible(&mut self, visible: usize) {
        self.visible = visible.max(1);
        self.scroll_into_view();
    }

    /// Jump to `index`, clamped to the last row.
    pub fn select(&mut self, index: usize) {
        self.index = index.min(self.count.saturating_sub(1));
        self.scroll_into_view();
    }

    pub fn move_up(&mut self) {
        if self.count == 0 {
            return;
        }
        self.index = if self.index == 0 {
            self.count - 1
        } else {
            self.index - 1
        };
        self.scroll_into_view();
    }

    pub fn move_down(&mut self) {
        if self.count == 0 {
            return;
        }
        self.index = (self.index + 1) % self.count;
        self.scroll_into_view();
    }

    fn scroll_into_view(&mut self) {
        if self.index < self.offset {
            self.offset = self.index;
        } else if self.index >= self.offset + self.visible {
            self.offset = self.index + 1 - self.visible;
        }
        let max_offset = self.count.saturating_sub(self.visible);
        self.offset = self.offset.min(max_offset);
    }
}
