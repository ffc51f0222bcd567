//! Tests for the viewer's recompute triggers and event emission.

use super::*;
use std::cell::RefCell;
use std::rc::Rc;

fn entries(range: std::ops::RangeInclusive<u64>) -> Vec<LogEntry> {
    range
        .map(|i| LogEntry::new(i, format!("Log entry {i}")))
        .collect()
}

fn tagged(i: u64, node: &str) -> LogEntry {
    LogEntry::new(i, format!("Log entry {i}")).with_node(node)
}

/// Record every event of `name` published by `viewer`.
fn record(viewer: &mut Viewer, name: EventName) -> Rc<RefCell<Vec<ViewerEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    viewer.subscribe(name, move |event| sink.borrow_mut().push(*event));
    seen
}

// ===== Construction =====

#[test]
fn idle_viewer_starts_at_top() {
    let viewer = Viewer::new(ViewerOptions::new(entries(1..=100)));

    assert_eq!(viewer.window(), RenderWindow::new(0, 27));
    assert_eq!(viewer.scroll_offset(), 0);
    assert_eq!(viewer.follow_state(), FollowState::Idle);
}

#[test]
fn following_viewer_starts_at_tail() {
    let viewer = Viewer::new(ViewerOptions::new(entries(1..=100)).with_follow(true));

    assert_eq!(viewer.window(), RenderWindow::new(73, 100));
    assert_eq!(viewer.scroll_offset(), 76);
}

#[test]
fn empty_viewer_has_empty_window() {
    let viewer = Viewer::new(ViewerOptions::default());

    assert!(viewer.window().is_empty());
    assert!(viewer.materialized().is_empty());
    assert_eq!(viewer.filtered_len(), 0);
}

#[test]
fn initial_selection_is_applied_silently() {
    let viewer = Viewer::new(ViewerOptions::new(entries(1..=200)).with_selected_line(100));

    assert_eq!(viewer.selected_line(), Some(LineNumber::new(100)));
}

#[test]
fn initial_jump_positions_window_on_target() {
    let viewer = Viewer::new(ViewerOptions::new(entries(1..=1000)).with_jump_to_line(500));

    assert!(viewer.window().contains(499));
    assert!(viewer.pending_jump().is_some());
}

#[test]
fn initial_jump_to_missing_line_is_ignored() {
    let viewer = Viewer::new(ViewerOptions::new(entries(1..=10)).with_jump_to_line(99));

    assert!(viewer.pending_jump().is_none());
    assert_eq!(viewer.scroll_offset(), 0);
}

#[test]
fn out_of_order_initial_entries_are_skipped() {
    let mut initial = entries(1..=5);
    initial.push(LogEntry::new(3, "late"));
    let viewer = Viewer::new(ViewerOptions::new(initial));

    assert_eq!(viewer.store().len(), 5);
}

// ===== Renderer ceiling =====

#[test]
fn materialized_never_exceeds_ceiling_in_page_mode() {
    let provider = FenwickRangeProvider::new(3).with_page_mode(true);
    let viewer = Viewer::with_provider(
        ViewerOptions::new(entries(1..=5000)).with_max_line(10_000),
        Box::new(provider),
    );

    assert_eq!(viewer.filtered_len(), 5000);
    assert_eq!(viewer.materialized().len(), DEFAULT_RENDERER_CEILING);
}

#[test]
fn lowering_ceiling_degrades_window() {
    let provider = FenwickRangeProvider::new(3).with_page_mode(true);
    let mut viewer = Viewer::with_provider(
        ViewerOptions::new(entries(1..=500)),
        Box::new(provider),
    );
    assert_eq!(viewer.window().len(), 500);

    viewer.set_renderer_ceiling(100);

    assert!(viewer.window().len() <= 100);
    assert!(viewer.materialized().len() <= 100);
}

// ===== Append / follow =====

#[test]
fn append_while_following_pins_tail() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=100)).with_follow(true));

    viewer.append(entries(101..=101));

    assert_eq!(viewer.window(), RenderWindow::new(74, 101));
    assert_eq!(viewer.scroll_offset(), 77);
    let last = viewer.materialized().last().map(|e| e.line_number());
    assert_eq!(last, Some(LineNumber::new(101)));
}

#[test]
fn append_while_idle_leaves_window_and_offset() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=100)));
    let before = viewer.window();
    let updates = record(&mut viewer, EventName::Update);

    viewer.append(entries(101..=101));

    assert_eq!(viewer.window(), before);
    assert_eq!(viewer.scroll_offset(), 0);
    assert!(updates.borrow().is_empty());
    assert_eq!(viewer.filtered_len(), 101);
}

#[test]
fn append_while_idle_leaves_an_unfilled_viewport_alone() {
    let mut viewer = Viewer::new(
        ViewerOptions::new(entries(1..=100)).with_viewport(ViewportState::new(0, 200)),
    );
    assert_eq!(viewer.window(), RenderWindow::new(0, 100));
    let updates = record(&mut viewer, EventName::Update);

    viewer.append(entries(101..=101));

    assert_eq!(viewer.window(), RenderWindow::new(0, 100));
    assert_eq!(viewer.scroll_offset(), 0);
    assert!(updates.borrow().is_empty());
    assert_eq!(viewer.filtered_len(), 101);
}

#[test]
fn append_while_idle_reclamps_window_after_eviction() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=30)).with_max_line(30));
    viewer.on_scroll(6);
    assert_eq!(viewer.window(), RenderWindow::new(3, 30));

    viewer.append(entries(31..=35));

    assert!(viewer.window().end_index <= viewer.filtered_len());
    assert!(!viewer.is_following());
}

#[test]
fn append_evicts_oldest_beyond_max_line() {
    let mut viewer = Viewer::new(
        ViewerOptions::new(entries(1..=10))
            .with_max_line(10)
            .with_follow(true),
    );

    let outcome = viewer.append(entries(11..=13));

    assert_eq!(outcome.evicted, 3);
    assert_eq!(viewer.store().first_line_number(), Some(LineNumber::new(4)));
    assert_eq!(viewer.filtered_len(), 10);
    assert_eq!(viewer.total_rows(), 10);
}

#[test]
fn coalesced_appends_recompute_once_per_tick() {
    let mut viewer = Viewer::new(
        ViewerOptions::new(entries(1..=100))
            .with_follow(true)
            .with_recompute_mode(RecomputeMode::Coalesced),
    );
    let baseline = viewer.recompute_count();

    viewer.append(entries(101..=101));
    viewer.append(entries(102..=102));
    viewer.append(entries(103..=103));
    assert_eq!(viewer.recompute_count(), baseline);

    viewer.tick();

    assert_eq!(viewer.recompute_count(), baseline + 1);
    assert_eq!(viewer.window().end_index, 103);
    assert_eq!(viewer.store().len(), 103);
}

#[test]
fn duplicate_append_changes_nothing() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=10)).with_follow(true));
    let updates = record(&mut viewer, EventName::Update);

    let outcome = viewer.append(entries(10..=10));

    assert!(!outcome.changed());
    assert_eq!(outcome.skipped.len(), 1);
    assert!(updates.borrow().is_empty());
}

#[test]
fn scrolling_away_from_tail_leaves_follow() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=100)).with_follow(true));

    viewer.on_scroll(10);

    assert_eq!(viewer.follow_state(), FollowState::Idle);

    viewer.append(entries(101..=101));
    assert_eq!(viewer.scroll_offset(), 10);
}

#[test]
fn scrolling_at_tail_keeps_follow() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=100)).with_follow(true));

    viewer.on_scroll(usize::MAX);

    assert!(viewer.is_following());
}

#[test]
fn request_follow_snaps_to_tail() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=100)));

    viewer.request_follow();

    assert!(viewer.is_following());
    assert_eq!(viewer.window().end_index, 100);
}

#[test]
fn scroll_by_clamps_at_both_ends() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=100)));

    viewer.scroll_by(-5);
    assert_eq!(viewer.scroll_offset(), 0);

    viewer.scroll_by(1000);
    assert_eq!(viewer.scroll_offset(), 76);
}

// ===== Replace / filter =====

#[test]
fn replace_all_keeps_follow_state() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=100)).with_follow(true));

    viewer.replace_all(entries(1..=50));

    assert!(viewer.is_following());
    assert_eq!(viewer.window().end_index, 50);
}

#[test]
fn replace_all_keeps_selection() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=100)).with_selected_line(40));

    viewer.replace_all(entries(1..=20));

    assert_eq!(viewer.selected_line(), Some(LineNumber::new(40)));
}

#[test]
fn node_filter_hides_other_nodes() {
    let initial = vec![
        tagged(1, "build"),
        tagged(2, "test"),
        tagged(3, "build"),
        LogEntry::new(4, "untagged"),
    ];
    let viewer = Viewer::new(
        ViewerOptions::new(initial).with_filter(ChunkFilter::new().with_node("build")),
    );

    let lines: Vec<u64> = viewer
        .materialized()
        .iter()
        .map(|e| e.line_number().get())
        .collect();
    assert_eq!(lines, vec![1, 3]);
}

#[test]
fn changing_filter_rebuilds_window() {
    let initial: Vec<LogEntry> = (1..=60)
        .map(|i| tagged(i, if i % 2 == 0 { "even" } else { "odd" }))
        .collect();
    let mut viewer = Viewer::new(ViewerOptions::new(initial));

    viewer.set_filter(ChunkFilter::new().with_node("even"));

    assert_eq!(viewer.filtered_len(), 30);
    assert!(viewer
        .materialized()
        .iter()
        .all(|e| e.node() == Some("even")));
}

// ===== Jump =====

#[test]
fn jump_emits_jumped_once_after_tick() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=1000)));
    let jumped = record(&mut viewer, EventName::Jumped);

    viewer.jump_to(500).expect("line 500 exists");
    assert!(jumped.borrow().is_empty(), "jumped waits for render settle");
    assert!(viewer.window().contains(499));

    assert!(viewer.tick());
    assert!(!viewer.tick());
    assert_eq!(jumped.borrow().len(), 1);
}

#[test]
fn jump_centers_target() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=1000)));

    viewer.jump_to(500).unwrap();

    assert_eq!(viewer.scroll_offset(), 487);
    assert_eq!(viewer.window(), RenderWindow::new(484, 514));
}

#[test]
fn jump_with_start_alignment_puts_target_on_top() {
    let mut viewer = Viewer::new(
        ViewerOptions::new(entries(1..=1000)).with_jump_align(JumpAlign::Start),
    );

    viewer.jump_to(500).unwrap();

    assert_eq!(viewer.scroll_offset(), 499);
}

#[test]
fn jump_to_missing_line_is_error_without_event() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=100)));
    let jumped = record(&mut viewer, EventName::Jumped);
    let before = viewer.window();

    let err = viewer.jump_to(1000).unwrap_err();

    assert_eq!(
        err,
        NavigationError::LineNotFound {
            line: LineNumber::new(1000)
        }
    );
    viewer.tick();
    assert!(jumped.borrow().is_empty());
    assert_eq!(viewer.window(), before);
}

#[test]
fn jump_to_filtered_out_line_fails() {
    let initial = vec![tagged(1, "a"), tagged(2, "b"), tagged(3, "a")];
    let mut viewer = Viewer::new(
        ViewerOptions::new(initial).with_filter(ChunkFilter::new().with_node("a")),
    );

    assert!(viewer.jump_to(2).is_err());
    assert!(viewer.jump_to(3).is_ok());
}

#[test]
fn jump_disables_follow() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=1000)).with_follow(true));

    viewer.jump_to(10).unwrap();
    viewer.append(entries(1001..=1001));

    assert_eq!(viewer.follow_state(), FollowState::Idle);
    assert!(viewer.window().contains(9));
}

#[test]
fn superseded_jump_emits_once() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=1000)));
    let jumped = record(&mut viewer, EventName::Jumped);

    let first = viewer.jump_to(100).unwrap();
    let second = viewer.jump_to(900).unwrap();

    assert!(!viewer.complete_jump(first));
    assert!(viewer.complete_jump(second));
    viewer.tick();
    assert_eq!(jumped.borrow().len(), 1);
}

// ===== Selection / events =====

#[test]
fn select_line_publishes_line_number() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=200)).with_selected_line(100));
    let selected = record(&mut viewer, EventName::LineSelect);

    viewer.select_line(100);

    assert_eq!(
        *selected.borrow(),
        vec![ViewerEvent::LineSelect(LineNumber::new(100))]
    );
}

#[test]
fn update_fires_only_on_window_change() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=100)));
    let updates = record(&mut viewer, EventName::Update);

    viewer.on_scroll(0);
    assert!(updates.borrow().is_empty());

    viewer.on_scroll(20);
    assert_eq!(
        *updates.borrow(),
        vec![ViewerEvent::Update(RenderWindow::new(17, 47))]
    );
}

#[test]
fn unsubscribed_handler_receives_nothing() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=100)));
    let seen = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&seen);
    let id = viewer.subscribe(EventName::LineSelect, move |_| *sink.borrow_mut() += 1);

    assert!(viewer.unsubscribe(id));
    viewer.select_line(5);

    assert_eq!(*seen.borrow(), 0);
}

#[test]
fn filter_hiding_pending_jump_target_cancels_it() {
    let initial: Vec<LogEntry> = (1..=60)
        .map(|i| tagged(i, if i % 2 == 0 { "even" } else { "odd" }))
        .collect();
    let mut viewer = Viewer::new(ViewerOptions::new(initial));
    let jumped = record(&mut viewer, EventName::Jumped);
    viewer.jump_to(41).unwrap();

    viewer.set_filter(ChunkFilter::new().with_node("even"));

    assert!(viewer.pending_jump().is_none());
    assert!(!viewer.tick());
    assert!(jumped.borrow().is_empty());
}

#[test]
fn replace_all_without_pending_jump_target_cancels_it() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=1000)));
    let jumped = record(&mut viewer, EventName::Jumped);
    viewer.jump_to(800).unwrap();

    viewer.replace_all(entries(1..=100));

    assert!(viewer.pending_jump().is_none());
    assert!(!viewer.tick());
    assert!(jumped.borrow().is_empty());
}

#[test]
fn replace_all_keeps_pending_jump_target_materialized() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=1000)));
    viewer.jump_to(500).unwrap();

    viewer.replace_all(entries(201..=1000));

    let pending = viewer.pending_jump().copied().expect("line 500 survives");
    assert_eq!(pending.index, 299);
    assert!(viewer.window().contains(299));
    assert!(viewer.tick());
}

// ===== Viewport =====

#[test]
fn resize_while_following_keeps_tail() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=100)).with_follow(true));

    viewer.on_resize(10);

    assert_eq!(viewer.scroll_offset(), 90);
    assert_eq!(viewer.window().end_index, 100);
}

#[test]
fn wrap_width_changes_row_estimates() {
    let long = "x".repeat(100);
    let initial: Vec<LogEntry> = (1..=10).map(|i| LogEntry::new(i, long.clone())).collect();
    let mut viewer = Viewer::new(
        ViewerOptions::new(initial).with_estimator(ItemSizeEstimator::Wrapped { width: 100 }),
    );
    assert_eq!(viewer.total_rows(), 10);

    viewer.set_wrap_width(50);

    assert_eq!(viewer.total_rows(), 20);
}

#[test]
fn resize_before_jump_settles_keeps_target_materialized() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=1000)).with_jump_to_line(500));
    let jumped = record(&mut viewer, EventName::Jumped);

    viewer.on_resize(9);

    assert!(viewer.window().contains(499), "window {:?}", viewer.window());
    assert_eq!(viewer.scroll_offset(), 495);
    assert!(viewer.tick());
    assert_eq!(*jumped.borrow(), vec![ViewerEvent::Jumped]);
}

#[test]
fn rewrap_before_jump_settles_keeps_target_materialized() {
    let long = "x".repeat(100);
    let initial: Vec<LogEntry> = (1..=1000).map(|i| LogEntry::new(i, long.clone())).collect();
    let mut viewer = Viewer::new(
        ViewerOptions::new(initial)
            .with_estimator(ItemSizeEstimator::Wrapped { width: 100 })
            .with_jump_to_line(500),
    );

    viewer.set_wrap_width(25);

    assert!(viewer.window().contains(499), "window {:?}", viewer.window());
}

#[test]
fn resize_after_jump_settles_keeps_offset() {
    let mut viewer = Viewer::new(ViewerOptions::new(entries(1..=1000)));
    viewer.jump_to(500).unwrap();
    viewer.tick();
    let offset = viewer.scroll_offset();

    viewer.on_resize(9);

    assert_eq!(viewer.scroll_offset(), offset);
}
