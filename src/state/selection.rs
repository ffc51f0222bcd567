//! Exclusive single-line selection.

use crate::events::{EventChannel, ViewerEvent};
use crate::model::LineNumber;

/// Tracks the one selected line.
///
/// Selection is independent of the render window: selecting an
/// off-screen line is legal and does not navigate.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: Option<LineNumber>,
}

impl SelectionManager {
    /// Start with `initial` selected, without publishing anything.
    pub fn new(initial: Option<LineNumber>) -> Self {
        Self { selected: initial }
    }

    /// Select `line` and publish `line-select`.
    ///
    /// Re-selecting the current line publishes again; hosts use the event
    /// to scroll or highlight.
    pub fn select_line(&mut self, line: LineNumber, events: &mut EventChannel) {
        self.selected = Some(line);
        events.publish(ViewerEvent::LineSelect(line));
    }

    /// Forget the selection.
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// The selected line, if any.
    pub fn selected(&self) -> Option<LineNumber> {
        self.selected
    }

    /// Whether `line` is the selection.
    pub fn is_selected(&self, line: LineNumber) -> bool {
        self.selected == Some(line)
    }
}
