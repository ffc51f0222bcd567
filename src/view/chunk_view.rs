//! Widget rendering the viewer's materialized window.
//!
//! Rows are laid out with the same estimator the size index uses, so the
//! scroll offset maps to exactly the rows drawn here.

use super::constants::{
    LEVEL_WIDTH, LINE_NUMBER_WIDTH, NODE_WIDTH, STEP_WIDTH, TIME_WIDTH,
};
use super::styles::LogStyles;
use crate::config::ResolvedConfig;
use crate::model::LogEntry;
use crate::viewer::Viewer;
use crate::virtual_list::{wrap_rows, ItemSizeEstimator};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

/// Which gutter columns are drawn.
///
/// Column order is line number, time, level, node, step context. With
/// `gutter` off only the log text is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Draw the gutter at all.
    pub gutter: bool,
    /// Timestamp column.
    pub time: bool,
    /// Step-context column.
    pub command: bool,
    /// Node column.
    pub node_icon: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            gutter: true,
            time: false,
            command: false,
            node_icon: true,
        }
    }
}

impl DisplayOptions {
    /// Toggles taken from resolved configuration.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            gutter: config.gutter,
            time: config.time,
            command: config.command,
            node_icon: config.node_icon,
        }
    }

    /// Columns taken by the gutter, trailing space included.
    pub fn gutter_width(&self) -> usize {
        if !self.gutter {
            return 0;
        }
        let mut width = LINE_NUMBER_WIDTH + 1 + LEVEL_WIDTH + 1;
        if self.time {
            width += TIME_WIDTH + 1;
        }
        if self.node_icon {
            width += NODE_WIDTH + 1;
        }
        if self.command {
            width += STEP_WIDTH + 1;
        }
        width
    }
}

/// Renders the current render window of a [`Viewer`].
///
/// Only materialized entries are touched; the widget never looks at the rest
/// of the chunk.
#[derive(Debug, Clone, Copy)]
pub struct ChunkView<'a> {
    viewer: &'a Viewer,
    styles: LogStyles,
    display: DisplayOptions,
}

impl<'a> ChunkView<'a> {
    /// Widget over `viewer` with default styles and columns.
    pub fn new(viewer: &'a Viewer) -> Self {
        Self {
            viewer,
            styles: LogStyles::default(),
            display: DisplayOptions::default(),
        }
    }

    /// Set the styles.
    pub fn styles(mut self, styles: LogStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Set the gutter columns.
    pub fn display(mut self, display: DisplayOptions) -> Self {
        self.display = display;
        self
    }
}

impl Widget for ChunkView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        let window = self.viewer.window();
        // Rows of the first materialized entry that sit above the viewport
        let skip = self
            .viewer
            .scroll_offset()
            .saturating_sub(self.viewer.row_offset_of(window.start_index));
        let estimator = self.viewer.estimator();
        let selected = self.viewer.selected_line();

        let rows = self.viewer.materialized().into_iter().flat_map(|entry| {
            let is_selected = selected == Some(entry.line_number());
            entry_rows(entry, estimator, self.display, &self.styles, is_selected)
        });

        for (y, line) in (area.top()..area.bottom()).zip(rows.skip(skip)) {
            buf.set_line(area.left(), y, &line, area.width);
        }
    }
}

/// Rows for one entry; always exactly `estimator.estimate(entry)` of them.
fn entry_rows(
    entry: &LogEntry,
    estimator: ItemSizeEstimator,
    display: DisplayOptions,
    styles: &LogStyles,
    selected: bool,
) -> Vec<Line<'static>> {
    let mut chunks: Vec<String> = match estimator {
        ItemSizeEstimator::Fixed(_) => entry.log().lines().map(str::to_string).collect(),
        ItemSizeEstimator::Wrapped { width } => wrap_rows(entry.log(), usize::from(width))
            .into_iter()
            .map(str::to_string)
            .collect(),
    };
    chunks.resize(estimator.estimate(entry), String::new());

    let text_style = styles.style_for_level(entry.level());
    let continuation = " ".repeat(display.gutter_width());

    chunks
        .into_iter()
        .enumerate()
        .map(|(row, text)| {
            let gutter = if row == 0 {
                gutter_text(entry, display)
            } else {
                continuation.clone()
            };
            let line = Line::from(vec![
                Span::styled(gutter, styles.gutter()),
                Span::styled(text, text_style),
            ]);
            if selected {
                line.style(styles.selected())
            } else {
                line
            }
        })
        .collect()
}

fn gutter_text(entry: &LogEntry, display: DisplayOptions) -> String {
    if !display.gutter {
        return String::new();
    }

    let mut gutter = format!(
        "{:>width$} ",
        entry.line_number(),
        width = LINE_NUMBER_WIDTH
    );
    if display.time {
        let time = entry
            .time()
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_default();
        push_column(&mut gutter, &time, TIME_WIDTH);
    }
    push_column(&mut gutter, entry.level(), LEVEL_WIDTH);
    if display.node_icon {
        push_column(&mut gutter, entry.node().unwrap_or(""), NODE_WIDTH);
    }
    if display.command {
        push_column(&mut gutter, entry.step_ctx().unwrap_or(""), STEP_WIDTH);
    }
    gutter
}

/// Append `text` padded or truncated to `width` chars, then a space.
fn push_column(gutter: &mut String, text: &str, width: usize) {
    let truncated: String = text.chars().take(width).collect();
    gutter.push_str(&format!("{truncated:<width$} "));
}
