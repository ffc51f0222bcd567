//! Bridge between the unbounded filtered view and a bounded render window.
//!
//! Whatever the provider asks for, the adapter hands out windows no longer
//! than the renderer ceiling. An over-request (page mode, huge overscan) is
//! cut down to the ceiling around the scroll position; scrolling then
//! reveals the rest incrementally.

use super::estimator::ItemSizeEstimator;
use super::primitive::VisibleRangeProvider;
use super::size_index::SizeIndex;
use super::window::{RenderWindow, ViewportState, WindowPlan};
use crate::model::LogEntry;
use serde::Deserialize;
use std::fmt;
use std::ops::Range;
use tracing::{debug, warn};

/// Upper bound on simultaneously materialized items for the stock renderer.
pub const DEFAULT_RENDERER_CEILING: usize = 1000;

/// Where a jump target lands in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JumpAlign {
    /// Target row in the middle of the viewport.
    #[default]
    Center,
    /// Target row at the top of the viewport.
    Start,
}

/// Turns provider ranges into ceiling-respecting windows.
pub struct VirtualizerAdapter {
    ceiling: usize,
    provider: Box<dyn VisibleRangeProvider>,
    estimator: ItemSizeEstimator,
    sizes: SizeIndex,
}

impl fmt::Debug for VirtualizerAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualizerAdapter")
            .field("ceiling", &self.ceiling)
            .field("estimator", &self.estimator)
            .field("items", &self.sizes.len())
            .field("total_rows", &self.sizes.total())
            .finish_non_exhaustive()
    }
}

impl VirtualizerAdapter {
    /// Create an adapter.
    ///
    /// A ceiling of 0 is raised to 1 so a non-empty list always shows
    /// something.
    pub fn new(
        ceiling: usize,
        provider: Box<dyn VisibleRangeProvider>,
        estimator: ItemSizeEstimator,
    ) -> Self {
        Self {
            ceiling: ceiling.max(1),
            provider,
            estimator,
            sizes: SizeIndex::new(0),
        }
    }

    /// Effective renderer ceiling.
    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Row estimator in use.
    pub fn estimator(&self) -> ItemSizeEstimator {
        self.estimator
    }

    /// Per-entry row estimates.
    pub fn sizes(&self) -> &SizeIndex {
        &self.sizes
    }

    /// Lower or raise the ceiling; callers must re-validate their window.
    pub fn set_ceiling(&mut self, ceiling: usize) {
        self.ceiling = ceiling.max(1);
    }

    /// Swap the estimator; callers must rebuild sizes afterwards.
    pub fn set_estimator(&mut self, estimator: ItemSizeEstimator) {
        self.estimator = estimator;
    }

    /// Re-estimate every item from scratch.
    pub fn rebuild_sizes<'a>(&mut self, entries: impl Iterator<Item = &'a LogEntry>) {
        let estimator = self.estimator;
        self.sizes = SizeIndex::from_sizes(entries.map(|e| estimator.estimate(e)));
    }

    /// Estimate and append items added at the tail.
    pub fn extend_sizes<'a>(&mut self, entries: impl Iterator<Item = &'a LogEntry>) {
        for entry in entries {
            self.sizes.push(self.estimator.estimate(entry));
        }
    }

    /// Largest meaningful scroll offset for `viewport`.
    pub fn max_scroll_offset(&self, viewport: ViewportState) -> usize {
        self.sizes.total().saturating_sub(viewport.height)
    }

    /// Window for the current viewport.
    ///
    /// Delegates to the provider and clamps the answer so that
    /// `end - start <= ceiling` and `end <= total`.
    pub fn compute_window(&self, total: usize, viewport: ViewportState) -> RenderWindow {
        let requested = self
            .provider
            .compute_visible_range(total, viewport, &self.sizes);
        let window = self.clamp(requested, total, viewport);
        self.guard(window, total)
    }

    /// Window and scroll offset pinned to the newest item.
    pub fn window_at_tail(&self, total: usize, viewport: ViewportState) -> WindowPlan {
        let scroll_offset = self.max_scroll_offset(viewport);
        let mut window = self.compute_window(total, viewport.at_offset(scroll_offset));

        if window.end_index != total {
            let len = window.len().clamp(1, self.ceiling).min(total);
            window = RenderWindow::new(total - len, total);
        }

        WindowPlan {
            window,
            scroll_offset,
        }
    }

    /// Window and scroll offset that bring item `index` into view.
    pub fn window_around(
        &self,
        index: usize,
        total: usize,
        viewport: ViewportState,
        align: JumpAlign,
    ) -> WindowPlan {
        let item_start = self.sizes.offset_of(index.min(self.sizes.len()));
        let desired = match align {
            JumpAlign::Start => item_start,
            JumpAlign::Center => {
                let item_rows = self.sizes.size_of(index).unwrap_or(1);
                (item_start + item_rows / 2).saturating_sub(viewport.height / 2)
            }
        };
        let scroll_offset = desired.min(self.max_scroll_offset(viewport));
        let mut window = self.compute_window(total, viewport.at_offset(scroll_offset));

        if !window.contains(index) && index < total {
            let len = window.len().clamp(1, self.ceiling).min(total);
            let start = index.saturating_sub(len / 2).min(total - len);
            window = RenderWindow::new(start, start + len);
        }

        WindowPlan {
            window,
            scroll_offset,
        }
    }

    /// Re-check a previously computed window against the current ceiling.
    ///
    /// Used after the ceiling shrinks or the list changes under a window
    /// that was not recomputed.
    pub fn revalidate(
        &self,
        window: RenderWindow,
        total: usize,
        viewport: ViewportState,
    ) -> RenderWindow {
        if window.end_index <= total && window.len() <= self.ceiling {
            return window;
        }
        let degraded = self.guard(window, total);
        if degraded.end_index <= total && degraded.len() <= self.ceiling {
            degraded
        } else {
            self.compute_window(total, viewport)
        }
    }

    fn clamp(&self, requested: Range<usize>, total: usize, viewport: ViewportState) -> RenderWindow {
        let end = requested.end.min(total);
        let start = requested.start.min(end);

        if end - start <= self.ceiling {
            return RenderWindow::new(start, end);
        }

        // Over-request: keep a ceiling-sized slice anchored where the user
        // is actually looking.
        let anchor = self
            .sizes
            .index_at(viewport.scroll_offset)
            .unwrap_or(start)
            .clamp(start, end - self.ceiling);
        debug!(
            requested_start = start,
            requested_end = end,
            ceiling = self.ceiling,
            anchor,
            "Provider window exceeds renderer ceiling, clamping"
        );
        RenderWindow::new(anchor, anchor + self.ceiling)
    }

    /// Degrade any window that still exceeds the ceiling.
    fn guard(&self, window: RenderWindow, total: usize) -> RenderWindow {
        if window.len() <= self.ceiling && window.end_index <= total {
            return window;
        }
        let reduced = (self.ceiling / 2).max(1);
        let start = window.start_index.min(total.saturating_sub(reduced));
        let end = (start + reduced).min(total);
        warn!(
            start = window.start_index,
            end = window.end_index,
            ceiling = self.ceiling,
            reduced,
            "Render window exceeded ceiling, degrading"
        );
        RenderWindow::new(start, end)
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
