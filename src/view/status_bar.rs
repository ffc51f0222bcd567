//! Status bar: follow indicator, window bounds and key hints.

use super::styles::LogStyles;
use crate::state::FollowState;
use crate::viewer::Viewer;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

const KEY_HINTS: &str = "q:quit f:follow enter:select";

/// FOLLOW / IDLE indicator.
///
/// Stateless; the follow state is passed in.
#[derive(Debug, Clone, Copy)]
pub struct FollowIndicator {
    state: FollowState,
}

impl FollowIndicator {
    /// Indicator for `state`.
    pub fn new(state: FollowState) -> Self {
        Self { state }
    }

    /// `FOLLOW` or `IDLE`.
    pub fn label(&self) -> &'static str {
        match self.state {
            FollowState::Following => "FOLLOW",
            FollowState::Idle => "IDLE",
        }
    }

    /// Styled label for the status line.
    pub fn render(&self, styles: &LogStyles) -> Span<'static> {
        let style = match self.state {
            FollowState::Following => styles.following(),
            FollowState::Idle => Style::default(),
        };
        Span::styled(self.label(), style)
    }
}

/// Plain-text status: window bounds are 1-based and inclusive.
pub fn status_text(viewer: &Viewer) -> String {
    let indicator = FollowIndicator::new(viewer.follow_state());
    format!("{} | {}", indicator.label(), details(viewer))
}

/// Styled status line.
pub fn status_line(viewer: &Viewer, styles: &LogStyles) -> Line<'static> {
    let indicator = FollowIndicator::new(viewer.follow_state());
    Line::from(vec![
        indicator.render(styles),
        Span::raw(format!(" | {}", details(viewer))),
    ])
}

fn details(viewer: &Viewer) -> String {
    let window = viewer.window();
    let (first, last) = if window.is_empty() {
        (0, 0)
    } else {
        (window.start_index + 1, window.end_index)
    };
    let selected = viewer
        .selected_line()
        .map_or_else(|| "-".to_string(), |line| line.to_string());
    format!(
        "lines {first}-{last} of {} | selected {selected} | {KEY_HINTS}",
        viewer.filtered_len()
    )
}
