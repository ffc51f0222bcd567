//! The log chunk viewer: store, virtualizer and state machines wired together.
//!
//! Every trigger (append, replace, filter change, scroll, resize, jump)
//! runs an explicit recompute step that maps (store, filter, viewport) to a
//! render window. Nothing is observed implicitly.
//!
//! # Recompute triggers
//!
//! | Trigger          | Following                      | Idle                          |
//! |------------------|--------------------------------|-------------------------------|
//! | `append`         | window pinned to tail          | window and offset untouched   |
//! | `replace_all`    | window pinned to tail          | window recomputed at offset   |
//! | `set_filter`     | window pinned to tail          | window recomputed at offset   |
//! | `on_scroll`      | may leave follow               | window recomputed at offset   |
//! | `on_resize`      | window pinned to tail          | window recomputed at offset   |
//! | `jump_to`        | leaves follow, window on target| window on target              |

use crate::config::ResolvedConfig;
use crate::events::{EventChannel, EventName, SubscriptionId, ViewerEvent};
use crate::model::{LineNumber, LogEntry, NavigationError};
use crate::state::{
    FollowController, FollowState, JumpNavigator, JumpTicket, PendingJump, SelectionManager,
};
use crate::store::{AppendOutcome, ChunkFilter, ChunkStore, FilteredView, RetentionPolicy};
use crate::virtual_list::{
    FenwickRangeProvider, ItemSizeEstimator, JumpAlign, RenderWindow, ViewportState,
    VirtualizerAdapter, VisibleRangeProvider, WindowPlan, DEFAULT_RENDERER_CEILING,
};
use tracing::{debug, info, warn};

#[cfg(test)]
#[path = "viewer_tests.rs"]
mod tests;

/// Retained-entry ceiling used when none is configured.
pub const DEFAULT_MAX_LINE: usize = 2000;

/// When window recomputation runs after an append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecomputeMode {
    /// Recompute once per append.
    #[default]
    Immediate,
    /// Mark dirty and recompute once on the next `tick`.
    ///
    /// Appends within one tick share a single recomputation; no entry is
    /// ever dropped from the store.
    Coalesced,
}

/// Configuration accepted by [`Viewer::new`].
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    /// Initial entries.
    pub entries: Vec<LogEntry>,
    /// Node / step-context filter.
    pub filter: ChunkFilter,
    /// Ceiling on retained entries.
    pub max_line: usize,
    /// Initial follow state.
    pub follow: bool,
    /// Jump requested at construction.
    pub jump_to_line: Option<LineNumber>,
    /// Line selected at construction.
    pub selected_line_idx: Option<LineNumber>,
    /// Max materialized entries.
    pub renderer_ceiling: usize,
    /// How `max_line` is enforced.
    pub retention: RetentionPolicy,
    /// When appends recompute the window.
    pub recompute_mode: RecomputeMode,
    /// Where jump targets land.
    pub jump_align: JumpAlign,
    /// Initial viewport.
    pub viewport: ViewportState,
    /// Row estimates per entry.
    pub estimator: ItemSizeEstimator,
    /// Extra entries rendered beyond each viewport edge.
    pub overscan: usize,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            filter: ChunkFilter::default(),
            max_line: DEFAULT_MAX_LINE,
            follow: false,
            jump_to_line: None,
            selected_line_idx: None,
            renderer_ceiling: DEFAULT_RENDERER_CEILING,
            retention: RetentionPolicy::default(),
            recompute_mode: RecomputeMode::default(),
            jump_align: JumpAlign::default(),
            viewport: ViewportState::default(),
            estimator: ItemSizeEstimator::default(),
            overscan: 3,
        }
    }
}

impl ViewerOptions {
    /// Options with `entries` and defaults elsewhere.
    pub fn new(entries: Vec<LogEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    /// Options seeded from resolved configuration.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let estimator = if config.line_wrap {
            ItemSizeEstimator::Wrapped { width: 80 }
        } else {
            ItemSizeEstimator::Fixed(1)
        };
        Self {
            max_line: config.max_line,
            follow: config.follow,
            renderer_ceiling: config.renderer_ceiling,
            retention: config.retention,
            jump_align: config.jump_align,
            overscan: config.overscan,
            estimator,
            ..Self::default()
        }
    }

    /// Initial entries.
    pub fn with_entries(mut self, entries: Vec<LogEntry>) -> Self {
        self.entries = entries;
        self
    }

    /// Node/step filter.
    pub fn with_filter(mut self, filter: ChunkFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Retention ceiling.
    pub fn with_max_line(mut self, max_line: usize) -> Self {
        self.max_line = max_line;
        self
    }

    /// Start following the tail.
    pub fn with_follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }

    /// Jump to `line` once the first render settles.
    pub fn with_jump_to_line(mut self, line: impl Into<LineNumber>) -> Self {
        self.jump_to_line = Some(line.into());
        self
    }

    /// Initially selected line.
    pub fn with_selected_line(mut self, line: impl Into<LineNumber>) -> Self {
        self.selected_line_idx = Some(line.into());
        self
    }

    /// Max simultaneously materialized entries.
    pub fn with_renderer_ceiling(mut self, ceiling: usize) -> Self {
        self.renderer_ceiling = ceiling;
        self
    }

    /// What to do past `max_line`.
    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// Recompute on every append, or once per tick.
    pub fn with_recompute_mode(mut self, mode: RecomputeMode) -> Self {
        self.recompute_mode = mode;
        self
    }

    /// Placement of a jump target in the viewport.
    pub fn with_jump_align(mut self, align: JumpAlign) -> Self {
        self.jump_align = align;
        self
    }

    /// Initial viewport.
    pub fn with_viewport(mut self, viewport: ViewportState) -> Self {
        self.viewport = viewport;
        self
    }

    /// Row estimator for entries.
    pub fn with_estimator(mut self, estimator: ItemSizeEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Extra entries materialized past each viewport edge.
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }
}

/// One viewer instance over one chunk.
///
/// Owns its store and event channel exclusively; all mutation goes through
/// `append` and `replace_all`.
#[derive(Debug)]
pub struct Viewer {
    store: ChunkStore,
    filter: ChunkFilter,
    adapter: VirtualizerAdapter,
    follow: FollowController,
    jump: JumpNavigator,
    selection: SelectionManager,
    events: EventChannel,
    viewport: ViewportState,
    window: RenderWindow,
    /// Entries in the filtered view; always equals `adapter.sizes().len()`
    filtered_len: usize,
    recompute_mode: RecomputeMode,
    jump_align: JumpAlign,
    /// Coalesced recompute pending for the next tick
    dirty: bool,
    recompute_count: u64,
}

impl Viewer {
    /// Create a viewer using the stock Fenwick range provider.
    pub fn new(options: ViewerOptions) -> Self {
        let provider = FenwickRangeProvider::new(options.overscan);
        Self::with_provider(options, Box::new(provider))
    }

    /// Create a viewer on top of a custom virtualization primitive.
    ///
    /// An initial `jump_to_line` that is not in the filtered view is logged
    /// and ignored.
    pub fn with_provider(options: ViewerOptions, provider: Box<dyn VisibleRangeProvider>) -> Self {
        let ViewerOptions {
            entries,
            filter,
            max_line,
            follow,
            jump_to_line,
            selected_line_idx,
            renderer_ceiling,
            retention,
            recompute_mode,
            jump_align,
            viewport,
            estimator,
            overscan: _,
        } = options;

        let mut store = ChunkStore::new(max_line, retention);
        let outcome = store.replace_all(entries);

        let mut viewer = Self {
            store,
            filter,
            adapter: VirtualizerAdapter::new(renderer_ceiling, provider, estimator),
            follow: FollowController::new(follow),
            jump: JumpNavigator::new(),
            selection: SelectionManager::new(selected_line_idx),
            events: EventChannel::new(),
            viewport,
            window: RenderWindow::empty(),
            filtered_len: 0,
            recompute_mode,
            jump_align,
            dirty: false,
            recompute_count: 0,
        };
        viewer.resync_sizes();
        viewer.recompute();

        if let Some(line) = jump_to_line {
            if let Err(err) = viewer.jump_to(line) {
                warn!(error = %err, "Initial jump target unavailable");
            }
        }

        info!(
            entries = viewer.store.len(),
            skipped = outcome.skipped.len(),
            filtered = viewer.filtered_len,
            ceiling = viewer.adapter.ceiling(),
            follow = viewer.follow.is_following(),
            "Viewer initialized"
        );
        viewer
    }

    // ===== Ingestion =====

    /// Append entries from upstream.
    ///
    /// Malformed entries are skipped and reported in the outcome. While
    /// following, the window is re-pinned to the tail (now, or on the next
    /// `tick` in coalesced mode). While idle, window and scroll offset stay
    /// put; the window is only re-clamped when eviction shifted its indices.
    pub fn append(&mut self, entries: impl IntoIterator<Item = LogEntry>) -> AppendOutcome {
        let outcome = self.store.append(entries);
        if !outcome.changed() {
            return outcome;
        }
        self.sync_after_append(outcome.evicted > 0);

        if self.follow.is_following() {
            match self.recompute_mode {
                RecomputeMode::Immediate => self.recompute(),
                RecomputeMode::Coalesced => self.dirty = true,
            }
        } else if outcome.evicted > 0 {
            let window = self
                .adapter
                .revalidate(self.window, self.filtered_len, self.viewport);
            self.set_window(window);
        }

        outcome
    }

    /// Replace the whole chunk (full refresh).
    ///
    /// Follow state is left alone; only the window is re-evaluated. A
    /// pending jump whose line is gone is cancelled.
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = LogEntry>) -> AppendOutcome {
        let outcome = self.store.replace_all(entries);
        self.resync_sizes();
        self.recompute();
        outcome
    }

    /// Change the node / step-context filter.
    ///
    /// A pending jump to a line the new filter hides is cancelled.
    pub fn set_filter(&mut self, filter: ChunkFilter) {
        if filter == self.filter {
            return;
        }
        debug!(node = ?filter.node(), step_ctx = ?filter.step_ctx(), "Filter changed");
        self.filter = filter;
        self.resync_sizes();
        self.recompute();
    }

    // ===== Viewport =====

    /// The host scrolled to `scroll_offset` rows.
    ///
    /// Leaves follow mode unless the new window stays inside the tail window.
    pub fn on_scroll(&mut self, scroll_offset: usize) {
        self.viewport.scroll_offset = scroll_offset.min(self.adapter.max_scroll_offset(self.viewport));
        let landed = self.adapter.compute_window(self.filtered_len, self.viewport);
        let tail = self
            .adapter
            .window_at_tail(self.filtered_len, self.viewport)
            .window;
        self.follow.on_user_scroll(landed, tail);
        self.set_window(landed);
    }

    /// Scroll relative to the current offset.
    pub fn scroll_by(&mut self, delta: isize) {
        let current = self.viewport.scroll_offset;
        let target = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta.unsigned_abs())
        };
        self.on_scroll(target);
    }

    /// The host viewport changed height.
    ///
    /// A pending jump is re-anchored so its target stays materialized.
    pub fn on_resize(&mut self, height: usize) {
        if height == self.viewport.height {
            return;
        }
        self.viewport.height = height;
        self.recompute();
    }

    /// The host changed the text width; wrap-aware estimates are rebuilt.
    pub fn set_wrap_width(&mut self, width: u16) {
        let estimator = self.adapter.estimator().with_width(width);
        if estimator == self.adapter.estimator() {
            return;
        }
        self.adapter.set_estimator(estimator);
        self.resync_sizes();
        self.recompute();
    }

    /// Change the renderer ceiling; the current window is degraded if needed.
    pub fn set_renderer_ceiling(&mut self, ceiling: usize) {
        self.adapter.set_ceiling(ceiling);
        let window = self
            .adapter
            .revalidate(self.window, self.filtered_len, self.viewport);
        self.set_window(window);
    }

    // ===== Navigation =====

    /// Navigate to `line`.
    ///
    /// On success the window and scroll offset move to the target at once;
    /// the `jumped` event follows on the next `tick` (render settled).
    /// A newer jump supersedes this one's notification.
    ///
    /// # Errors
    ///
    /// `NavigationError::LineNotFound` if `line` is not in the filtered
    /// view. Nothing scrolls in that case.
    pub fn jump_to(&mut self, line: impl Into<LineNumber>) -> Result<JumpTicket, NavigationError> {
        let line = line.into();
        let pending = {
            let view = self.store.filtered_view(&self.filter);
            self.jump.request(line, &view)?
        };

        if self.follow.on_jump() {
            info!(line = %line, "Jump disabled follow mode");
        }

        let plan = self.adapter.window_around(
            pending.index,
            self.filtered_len,
            self.viewport,
            self.jump_align,
        );
        self.apply_plan(plan);
        debug!(line = %line, index = pending.index, "Jump scrolled");
        Ok(pending.ticket)
    }

    /// Resume tailing.
    pub fn request_follow(&mut self) {
        if self.follow.request_follow() {
            self.recompute();
        }
    }

    /// Select `line` and publish `line-select`.
    pub fn select_line(&mut self, line: impl Into<LineNumber>) {
        self.selection.select_line(line.into(), &mut self.events);
    }

    /// Drop the current selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ===== Scheduling =====

    /// One animation-frame tick: the previous render has settled.
    ///
    /// Runs a coalesced recompute if one is pending, then completes the
    /// pending jump. Returns `true` if `jumped` was published.
    pub fn tick(&mut self) -> bool {
        if self.dirty {
            self.recompute();
        }
        match self.jump.settle() {
            Some(done) => {
                debug!(line = %done.line, "Jump settled");
                self.events.publish(ViewerEvent::Jumped);
                true
            }
            None => false,
        }
    }

    /// Complete a specific jump when the host tracks tickets itself.
    ///
    /// Superseded tickets are ignored and publish nothing.
    pub fn complete_jump(&mut self, ticket: JumpTicket) -> bool {
        if self.jump.complete(ticket) {
            self.events.publish(ViewerEvent::Jumped);
            true
        } else {
            false
        }
    }

    // ===== Events =====

    /// Call `handler` for every `name` event until unsubscribed.
    pub fn subscribe(
        &mut self,
        name: EventName,
        handler: impl FnMut(&ViewerEvent) + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(name, handler)
    }

    /// Remove a subscription. `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // ===== Accessors =====

    /// Current render window (indices into the filtered view).
    pub fn window(&self) -> RenderWindow {
        self.window
    }

    /// Entries currently materialized; never more than the ceiling.
    pub fn materialized(&self) -> Vec<&LogEntry> {
        self.filtered_view()
            .slice(self.window.as_range())
            .to_vec()
    }

    /// Entries passing the current filter.
    pub fn filtered_view(&self) -> FilteredView<'_> {
        self.store.filtered_view(&self.filter)
    }

    /// Length of the filtered view.
    pub fn filtered_len(&self) -> usize {
        self.filtered_len
    }

    /// The backing store.
    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// The active filter.
    pub fn filter(&self) -> &ChunkFilter {
        &self.filter
    }

    /// Current viewport.
    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    /// Rows scrolled past the top.
    pub fn scroll_offset(&self) -> usize {
        self.viewport.scroll_offset
    }

    /// Total estimated rows of the filtered view.
    pub fn total_rows(&self) -> usize {
        self.adapter.sizes().total()
    }

    /// Line number of the entry at the top of the viewport.
    pub fn top_visible_line(&self) -> Option<LineNumber> {
        let index = self.adapter.sizes().index_at(self.viewport.scroll_offset)?;
        self.filtered_view().get(index).map(LogEntry::line_number)
    }

    /// Rows above filtered entry `index`.
    pub fn row_offset_of(&self, index: usize) -> usize {
        let sizes = self.adapter.sizes();
        sizes.offset_of(index.min(sizes.len()))
    }

    /// Current row estimator.
    pub fn estimator(&self) -> ItemSizeEstimator {
        self.adapter.estimator()
    }

    /// Effective renderer ceiling, at least 1.
    pub fn renderer_ceiling(&self) -> usize {
        self.adapter.ceiling()
    }

    /// Follow mode.
    pub fn follow_state(&self) -> FollowState {
        self.follow.state()
    }

    /// `true` while tailing.
    pub fn is_following(&self) -> bool {
        self.follow.is_following()
    }

    /// Selected line, if any.
    pub fn selected_line(&self) -> Option<LineNumber> {
        self.selection.selected()
    }

    /// The jump waiting for its render to settle.
    pub fn pending_jump(&self) -> Option<&PendingJump> {
        self.jump.pending()
    }

    /// Number of window recomputations so far.
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    // ===== Internals =====

    fn resync_sizes(&mut self) {
        let view = self.store.filtered_view(&self.filter);
        self.adapter.rebuild_sizes(view.iter());
        self.filtered_len = view.len();
    }

    fn sync_after_append(&mut self, evicted: bool) {
        if evicted {
            // Head removal shifts every index; rebuild.
            self.resync_sizes();
            return;
        }
        let view = self.store.filtered_view(&self.filter);
        self.adapter.extend_sizes(view.iter().skip(self.filtered_len));
        self.filtered_len = view.len();
    }

    fn recompute(&mut self) {
        self.dirty = false;
        self.recompute_count += 1;

        if self.follow.is_following() {
            let plan = self.adapter.window_at_tail(self.filtered_len, self.viewport);
            self.apply_plan(plan);
        } else if let Some(pending) = self.revalidate_pending_jump() {
            // Until the jump settles its target wins over the old offset.
            let plan = self.adapter.window_around(
                pending.index,
                self.filtered_len,
                self.viewport,
                self.jump_align,
            );
            self.apply_plan(plan);
        } else {
            let max_offset = self.adapter.max_scroll_offset(self.viewport);
            self.viewport.scroll_offset = self.viewport.scroll_offset.min(max_offset);
            let window = self.adapter.compute_window(self.filtered_len, self.viewport);
            self.set_window(window);
        }
    }

    fn revalidate_pending_jump(&mut self) -> Option<PendingJump> {
        self.jump.pending()?;
        let view = self.store.filtered_view(&self.filter);
        self.jump.revalidate(&view)
    }

    fn apply_plan(&mut self, plan: WindowPlan) {
        self.viewport.scroll_offset = plan.scroll_offset;
        self.set_window(plan.window);
    }

    fn set_window(&mut self, window: RenderWindow) {
        if window == self.window {
            return;
        }
        debug!(
            start = window.start_index,
            end = window.end_index,
            total = self.filtered_len,
            "Render window updated"
        );
        self.window = window;
        self.events.publish(ViewerEvent::Update(window));
    }
}
