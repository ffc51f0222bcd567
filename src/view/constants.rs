//! Layout dimension constants for TUI rendering.

use std::time::Duration;

/// Height of the status bar in lines.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Columns reserved for the line number.
pub const LINE_NUMBER_WIDTH: usize = 7;

/// Columns reserved for the level tag.
pub const LEVEL_WIDTH: usize = 5;

/// Columns reserved for the node name; longer names are truncated.
pub const NODE_WIDTH: usize = 12;

/// Columns reserved for the `HH:MM:SS` timestamp.
pub const TIME_WIDTH: usize = 8;

/// Columns reserved for the step context; longer values are truncated.
pub const STEP_WIDTH: usize = 12;

/// Event loop tick; one tick is one "render settled" cycle.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Rows moved per PageUp/PageDown when the viewport height is unknown.
pub const FALLBACK_PAGE_ROWS: usize = 20;
