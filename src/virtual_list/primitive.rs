//! The scroll virtualization primitive, consumed as a capability.
//!
//! The adapter only relies on the [`VisibleRangeProvider`] contract; any
//! windowing strategy can be substituted as long as the adapter's ceiling
//! clamp stays in front of it.

use super::size_index::SizeIndex;
use super::window::ViewportState;
use std::ops::Range;

/// Computes which items are visible for a given scroll state.
///
/// Implementations may return ranges larger than what can be rendered
/// (overscan, page mode); the adapter is responsible for clamping.
pub trait VisibleRangeProvider {
    /// Range of item indices to render.
    ///
    /// # Arguments
    /// * `total_count` - Items in the list
    /// * `viewport` - Scroll offset and height, in rows
    /// * `sizes` - Estimated rows per item
    fn compute_visible_range(
        &self,
        total_count: usize,
        viewport: ViewportState,
        sizes: &SizeIndex,
    ) -> Range<usize>;
}

/// Default provider: binary search over prefix sums plus overscan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenwickRangeProvider {
    overscan: usize,
    page_mode: bool,
}

impl FenwickRangeProvider {
    /// Provider with `overscan` entries past each edge.
    pub fn new(overscan: usize) -> Self {
        Self {
            overscan,
            page_mode: false,
        }
    }

    /// Render the whole list regardless of scroll position.
    ///
    /// This is how an unwindowed host behaves; it exists so the adapter's
    /// ceiling clamp can be exercised against a provider that over-requests.
    pub fn with_page_mode(mut self, page_mode: bool) -> Self {
        self.page_mode = page_mode;
        self
    }

    /// Entries rendered past each viewport edge.
    pub fn overscan(&self) -> usize {
        self.overscan
    }
}

impl Default for FenwickRangeProvider {
    fn default() -> Self {
        Self::new(3)
    }
}

impl VisibleRangeProvider for FenwickRangeProvider {
    fn compute_visible_range(
        &self,
        total_count: usize,
        viewport: ViewportState,
        sizes: &SizeIndex,
    ) -> Range<usize> {
        if total_count == 0 {
            return 0..0;
        }
        if self.page_mode {
            return 0..total_count;
        }

        let last = total_count - 1;
        let first_visible = sizes
            .index_at(viewport.scroll_offset)
            .unwrap_or(last)
            .min(last);
        if viewport.height == 0 {
            return first_visible..first_visible;
        }

        let bottom_row = viewport.scroll_offset + viewport.height - 1;
        let end_visible = sizes
            .index_at(bottom_row)
            .map_or(total_count, |idx| idx + 1)
            .min(total_count);

        let start = first_visible.saturating_sub(self.overscan);
        let end = (end_visible + self.overscan).min(total_count);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(n: usize) -> SizeIndex {
        SizeIndex::from_sizes(std::iter::repeat(1).take(n))
    }

    #[test]
    fn empty_list_is_empty_range() {
        let provider = FenwickRangeProvider::new(3);
        let range = provider.compute_visible_range(0, ViewportState::new(0, 10), &uniform(0));
        assert_eq!(range, 0..0);
    }

    #[test]
    fn top_of_list_without_overscan() {
        let provider = FenwickRangeProvider::new(0);
        let range = provider.compute_visible_range(100, ViewportState::new(0, 10), &uniform(100));
        assert_eq!(range, 0..10);
    }

    #[test]
    fn overscan_extends_both_sides() {
        let provider = FenwickRangeProvider::new(2);
        let range = provider.compute_visible_range(100, ViewportState::new(50, 10), &uniform(100));
        assert_eq!(range, 48..62);
    }

    #[test]
    fn overscan_is_clamped_to_bounds() {
        let provider = FenwickRangeProvider::new(5);
        let range = provider.compute_visible_range(20, ViewportState::new(15, 10), &uniform(20));
        assert_eq!(range, 10..20);
    }

    #[test]
    fn multi_row_items_shrink_visible_count() {
        let provider = FenwickRangeProvider::new(0);
        let sizes = SizeIndex::from_sizes(std::iter::repeat(3).take(30));
        let range = provider.compute_visible_range(30, ViewportState::new(9, 9), &sizes);
        assert_eq!(range, 3..6);
    }

    #[test]
    fn offset_past_end_shows_last_item() {
        let provider = FenwickRangeProvider::new(0);
        let range =
            provider.compute_visible_range(10, ViewportState::new(1_000, 5), &uniform(10));
        assert_eq!(range, 9..10);
    }

    #[test]
    fn page_mode_returns_whole_list() {
        let provider = FenwickRangeProvider::new(0).with_page_mode(true);
        let range =
            provider.compute_visible_range(5_000, ViewportState::new(0, 10), &uniform(5_000));
        assert_eq!(range, 0..5_000);
    }
}
