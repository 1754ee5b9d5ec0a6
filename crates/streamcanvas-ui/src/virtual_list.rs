//! Virtualized windowing for long fixed-height lists.
//!
//! Only the rows intersecting the viewport, plus an overscan buffer on each
//! side, are materialized. The cost of a range computation is proportional to
//! the window, never to the item count.

use std::ops::Range;

/// Configuration for a virtualized list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualListConfig {
    /// Height of every row, in logical pixels.
    pub item_height: f32,
    /// Height of the scrolling viewport.
    pub container_height: f32,
    /// Number of extra rows kept above and below the visible area.
    pub overscan: usize,
}

impl Default for VirtualListConfig {
    fn default() -> Self {
        Self {
            item_height: 40.0,
            container_height: 400.0,
            overscan: 5,
        }
    }
}

/// A row to render, with its distance from the top of the list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualItem {
    pub index: usize,
    pub offset_top: f32,
}

/// The slice of rows to render for one scroll position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VirtualRange {
    pub start_index: usize,
    /// Exclusive.
    pub end_index: usize,
    /// Height of the whole list, for sizing the scroll content.
    pub total_height: f32,
    pub items: Vec<VirtualItem>,
}

impl VirtualRange {
    pub fn range(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }
}

/// Compute the rows to render at `scroll_top`.
///
/// `item_height` and `container_height` are clamped to at least 1. A negative or
/// non-finite `scroll_top` is treated as 0. Scrolling past the end yields an
/// empty range at `item_count` rather than a start beyond the end.
pub fn compute_virtual_range(
    item_count: usize,
    item_height: f32,
    container_height: f32,
    scroll_top: f32,
    overscan: usize,
) -> VirtualRange {
    let item_height = clamp_extent(item_height);
    let container_height = clamp_extent(container_height);
    let scroll_top = if scroll_top.is_finite() {
        scroll_top.max(0.0)
    } else {
        0.0
    };

    let visible = (container_height / item_height).ceil() as usize;
    let first = (scroll_top / item_height).floor() as usize;
    let start_index = first.saturating_sub(overscan).min(item_count);
    let end_index = start_index
        .saturating_add(visible)
        .saturating_add(overscan.saturating_mul(2))
        .min(item_count);

    let items = (start_index..end_index)
        .map(|index| VirtualItem {
            index,
            offset_top: index as f32 * item_height,
        })
        .collect();

    VirtualRange {
        start_index,
        end_index,
        total_height: item_count as f32 * item_height,
        items,
    }
}

fn clamp_extent(extent: f32) -> f32 {
    if extent.is_finite() { extent.max(1.0) } else { 1.0 }
}

/// Scroll state for one virtualized list.
///
/// Every mutation recomputes the range, so [`range`](Self::range) is always
/// current.
#[derive(Debug, Clone)]
pub struct VirtualList {
    config: VirtualListConfig,
    item_count: usize,
    scroll_top: f32,
    range: VirtualRange,
}

impl VirtualList {
    pub fn new(item_count: usize) -> Self {
        Self::with_config(item_count, VirtualListConfig::default())
    }

    pub fn with_config(item_count: usize, config: VirtualListConfig) -> Self {
        let mut list = Self {
            config,
            item_count,
            scroll_top: 0.0,
            range: VirtualRange::default(),
        };
        list.recompute();
        list
    }

    pub fn config(&self) -> &VirtualListConfig {
        &self.config
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn range(&self) -> &VirtualRange {
        &self.range
    }

    pub fn total_height(&self) -> f32 {
        self.range.total_height
    }

    /// Largest scroll offset that still fills the viewport.
    pub fn max_scroll_top(&self) -> f32 {
        (self.range.total_height - clamp_extent(self.config.container_height)).max(0.0)
    }

    pub fn set_scroll_top(&mut self, scroll_top: f32) -> &VirtualRange {
        self.scroll_top = scroll_top;
        self.recompute()
    }

    /// Change the row count, keeping the scroll offset within the new content.
    pub fn set_item_count(&mut self, item_count: usize) -> &VirtualRange {
        if item_count != self.item_count {
            tracing::trace!("Virtual list item count {} -> {}", self.item_count, item_count);
        }
        self.item_count = item_count;
        self.recompute();
        if self.scroll_top > self.max_scroll_top() {
            self.scroll_top = self.max_scroll_top();
            self.recompute();
        }
        &self.range
    }

    pub fn set_container_height(&mut self, height: f32) -> &VirtualRange {
        self.config.container_height = height;
        self.recompute()
    }

    /// Scroll the minimum distance that brings `index` fully into view.
    pub fn scroll_to_index(&mut self, index: usize) -> &VirtualRange {
        if index >= self.item_count {
            return &self.range;
        }

        let item_height = clamp_extent(self.config.item_height);
        let viewport = clamp_extent(self.config.container_height);
        let top = index as f32 * item_height;
        if top < self.scroll_top {
            self.scroll_top = top;
        } else if top + item_height > self.scroll_top + viewport {
            self.scroll_top = (top + item_height - viewport).max(0.0);
        }
        self.recompute()
    }

    /// Row under the vertical content position `y`.
    pub fn item_at_position(&self, y: f32) -> Option<usize> {
        if y.is_nan() || y < 0.0 {
            return None;
        }
        let index = (y / clamp_extent(self.config.item_height)) as usize;
        (index < self.item_count).then_some(index)
    }

    fn recompute(&mut self) -> &VirtualRange {
        self.range = compute_virtual_range(
            self.item_count,
            self.config.item_height,
            self.config.container_height,
            self.scroll_top,
            self.config.overscan,
        );
        &self.range
    }
}
