//! Virtualized windowing: maps scroll state onto the minimal row range
//! worth rendering, from a per-row height table with cumulative offsets.

/// Height assumed for a row until a real measurement replaces it.
pub const DEFAULT_ROW_HEIGHT: u32 = 40;

/// Extra rows rendered on each side of the visible interval.
pub const OVERSCAN_ROWS: usize = 5;

/// The row interval to render, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub first: usize,
    pub last: usize,
}

#[derive(Debug, Clone)]
pub struct Viewport {
    heights: Vec<u32>,
    /// offsets[i] = top of row i; offsets[len] = total content height.
    offsets: Vec<u64>,
    default_height: u32,
    overscan: usize,
}

impl Viewport {
    pub fn new(default_height: u32, overscan: usize) -> Self {
        Self {
            heights: Vec::new(),
            offsets: vec![0],
            default_height,
            overscan,
        }
    }

    pub fn row_count(&self) -> usize {
        self.heights.len()
    }

    /// Sum of all row heights; sizes the scroll track. Zero when empty.
    pub fn total_height(&self) -> u64 {
        *self.offsets.last().unwrap_or(&0)
    }

    /// Absolute vertical offset of a row, for positioning it.
    pub fn row_offset(&self, index: usize) -> u64 {
        self.offsets[index]
    }

    /// Grow or shrink to `count` rows. Existing measurements are kept; new
    /// rows start at the default estimate. Scroll position is the caller's
    /// state and is only clamped, never reset.
    pub fn set_row_count(&mut self, count: usize) {
        if count == self.heights.len() {
            return;
        }
        let rebuild_from = count.min(self.heights.len());
        self.heights.resize(count, self.default_height);
        self.rebuild_offsets_from(rebuild_from);
    }

    /// Record a measured height for one row, updating cumulative offsets
    /// from that row onward.
    pub fn set_row_height(&mut self, index: usize, height: u32) {
        if index >= self.heights.len() || self.heights[index] == height {
            return;
        }
        self.heights[index] = height;
        self.rebuild_offsets_from(index);
    }

    fn rebuild_offsets_from(&mut self, index: usize) {
        self.offsets.truncate(index + 1);
        self.offsets.reserve(self.heights.len() - index);
        let mut running = self.offsets[index];
        for &height in &self.heights[index..] {
            running += u64::from(height);
            self.offsets.push(running);
        }
    }

    /// Clamp a scroll offset so the viewport never runs past the content.
    pub fn clamp_scroll(&self, scroll_offset: u64, viewport_height: u32) -> u64 {
        let max = self
            .total_height()
            .saturating_sub(u64::from(viewport_height));
        scroll_offset.min(max)
    }

    /// The minimal contiguous row interval intersecting
    /// `[scroll_offset, scroll_offset + viewport_height]`, expanded by the
    /// overscan margin and clamped to the row range. `None` when there are
    /// no rows (the renderer shows a placeholder instead).
    pub fn window(&self, scroll_offset: u64, viewport_height: u32) -> Option<Window> {
        let count = self.heights.len();
        if count == 0 {
            return None;
        }
        let bottom = scroll_offset + u64::from(viewport_height);

        // First row whose bottom edge is past the scroll top.
        let first = match self.offsets[1..=count].binary_search(&scroll_offset) {
            Ok(i) => i + 1, // bottom edge exactly at the top: row above is invisible
            Err(i) => i,
        }
        .min(count - 1);

        // Last row whose top edge is above the viewport bottom.
        let last = match self.offsets[..count].binary_search(&bottom) {
            Ok(i) => i.saturating_sub(1),
            Err(i) => i.saturating_sub(1),
        }
        .min(count - 1);

        Some(Window {
            first: first.saturating_sub(self.overscan),
            last: (last + self.overscan).min(count - 1),
        })
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_HEIGHT, OVERSCAN_ROWS)
    }
}
