//! Per-entry row estimates fed to the size index.

use crate::model::LogEntry;
use unicode_width::UnicodeWidthChar;

/// How many rows an entry is expected to occupy.
///
/// Estimates only need to be index-accurate, not pixel-perfect: the
/// virtualizer uses them to map scroll offsets to entry indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSizeEstimator {
    /// Every entry occupies the same number of rows (clamped to >= 1).
    Fixed(u16),
    /// Entries wrap at `width` columns exactly as [`wrap_rows`] splits
    /// them; each `\n`-separated line takes at least one row.
    Wrapped {
        /// Columns available for log text.
        width: u16,
    },
}

impl ItemSizeEstimator {
    /// Estimated rows for `entry`. Always >= 1.
    pub fn estimate(&self, entry: &LogEntry) -> usize {
        match *self {
            Self::Fixed(rows) => usize::from(rows.max(1)),
            Self::Wrapped { width } => wrapped_rows(entry.log(), usize::from(width)),
        }
    }

    /// Same estimator with a new wrap width; fixed estimators are unchanged.
    pub fn with_width(self, width: u16) -> Self {
        match self {
            Self::Fixed(_) => self,
            Self::Wrapped { .. } => Self::Wrapped { width },
        }
    }
}

impl Default for ItemSizeEstimator {
    fn default() -> Self {
        Self::Fixed(1)
    }
}

fn wrapped_rows(text: &str, width: usize) -> usize {
    wrap_rows(text, width).len().max(1)
}

/// Split `text` into display rows.
///
/// Each `\n`-separated line yields one or more rows; a row is broken before
/// the character that would push it past `width` display columns. A single
/// character wider than `width` still gets a row of its own. `width == 0`
/// disables wrapping.
pub fn wrap_rows(text: &str, width: usize) -> Vec<&str> {
    let mut rows = Vec::new();
    for line in text.lines() {
        if width == 0 {
            rows.push(line);
            continue;
        }
        let mut start = 0;
        let mut used = 0;
        for (at, ch) in line.char_indices() {
            let w = ch.width().unwrap_or(0);
            if used + w > width && at > start {
                rows.push(&line[start..at]);
                start = at;
                used = 0;
            }
            used += w;
        }
        rows.push(&line[start..]);
    }
    rows
}
