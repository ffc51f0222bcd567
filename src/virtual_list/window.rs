//! Render window and viewport state.

use std::ops::Range;

/// Contiguous index range of entries materialized for rendering.
///
/// Indices refer to the filtered view.
///
/// # Invariants
/// - `start_index <= end_index`
/// - `end_index - start_index` never exceeds the renderer ceiling once it
///   has passed through the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderWindow {
    /// Index of first materialized entry (inclusive).
    pub start_index: usize,
    /// Index past the last materialized entry (exclusive).
    pub end_index: usize,
}

impl RenderWindow {
    /// Create a new window.
    ///
    /// # Panics
    /// In debug builds, panics if `start_index > end_index`.
    pub fn new(start_index: usize, end_index: usize) -> Self {
        debug_assert!(
            start_index <= end_index,
            "window start {start_index} past end {end_index}"
        );
        Self {
            start_index,
            end_index,
        }
    }

    /// The empty window at index 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of materialized entries.
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    /// `true` when nothing is materialized.
    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    /// Check if a specific index is materialized.
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }

    /// Check if `other` lies entirely inside this window.
    pub fn encloses(&self, other: &RenderWindow) -> bool {
        other.start_index >= self.start_index && other.end_index <= self.end_index
    }

    /// The window as an index range.
    pub fn as_range(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    /// Iterate over materialized indices.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        self.as_range()
    }
}

/// Scroll state of the hosting viewport, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportState {
    /// Rows scrolled past the top of the list.
    pub scroll_offset: usize,
    /// Visible rows.
    pub height: usize,
}

impl ViewportState {
    /// Viewport at `scroll_offset` showing `height` rows.
    pub fn new(scroll_offset: usize, height: usize) -> Self {
        Self {
            scroll_offset,
            height,
        }
    }

    /// Same viewport scrolled to `offset`.
    pub fn at_offset(self, scroll_offset: usize) -> Self {
        Self {
            scroll_offset,
            ..self
        }
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scroll_offset: 0,
            height: 24,
        }
    }
}

/// A window together with the scroll offset the host should apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlan {
    /// Window to materialize.
    pub window: RenderWindow,
    /// Scroll offset to request from the host.
    pub scroll_offset: usize,
}
