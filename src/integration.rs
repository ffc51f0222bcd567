//! Pure glue between raw input lines and the viewer.
//!
//! Testable without I/O: the event loop feeds it whatever the source read.

use crate::model::{LogEntry, MalformedEntry};
use tracing::warn;

/// Parse JSONL lines into log entries.
///
/// Blank lines are ignored. A line that is not a valid entry becomes a
/// [`MalformedEntry`] carrying its source position and is logged; the rest
/// of the batch still parses.
///
/// # Arguments
///
/// * `lines` - Raw JSONL lines
/// * `first_source_line` - 1-based position of `lines[0]` in the input
pub fn process_lines(
    lines: Vec<String>,
    first_source_line: usize,
) -> (Vec<LogEntry>, Vec<MalformedEntry>) {
    let mut entries = Vec::with_capacity(lines.len());
    let mut malformed = Vec::new();

    for (offset, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let source_line = first_source_line + offset;
        match serde_json::from_str::<LogEntry>(line) {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                warn!(source_line, error = %err, "Skipping unparseable log line");
                malformed.push(MalformedEntry::unparseable(source_line, err.to_string()));
            }
        }
    }

    (entries, malformed)
}
