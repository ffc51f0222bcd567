//! Ordered entry storage for one node/step viewer instance.
//!
//! Entries are kept oldest at front, newest at back. Line numbers are
//! strictly ascending; anything that would break that is skipped and
//! reported as a [`MalformedEntry`].

use super::filter::{ChunkFilter, FilteredView};
use crate::model::{LineNumber, LogEntry, MalformedEntry};
use serde::Deserialize;
use std::collections::VecDeque;
use tracing::{debug, warn};

#[cfg(test)]
#[path = "chunk_store_tests.rs"]
mod tests;

/// What happens when the chunk holds more than `max_line` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetentionPolicy {
    /// Drop entries from the head until at or below `max_line`.
    #[default]
    EvictOldest,
    /// Keep everything; `max_line` is ignored.
    Unbounded,
}

/// Result of an `append` or `replace_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Entries stored.
    pub accepted: usize,
    /// Entries rejected for ordering.
    pub skipped: Vec<MalformedEntry>,
    /// Entries dropped from the head by retention.
    pub evicted: usize,
}

impl AppendOutcome {
    /// True if the stored sequence changed.
    pub fn changed(&self) -> bool {
        self.accepted > 0 || self.evicted > 0
    }
}

/// Ordered log entries for one chunk.
#[derive(Debug)]
pub struct ChunkStore {
    /// Oldest at front, newest at back
    entries: VecDeque<LogEntry>,
    max_line: usize,
    retention: RetentionPolicy,
    /// Highest line number ever accepted, survives eviction
    high_water: Option<LineNumber>,
}

impl ChunkStore {
    /// Create an empty store.
    ///
    /// # Arguments
    /// * `max_line` - Ceiling on retained entries
    /// * `retention` - How the ceiling is enforced
    pub fn new(max_line: usize, retention: RetentionPolicy) -> Self {
        Self {
            entries: VecDeque::new(),
            max_line,
            retention,
            high_water: None,
        }
    }

    /// Append entries in call order.
    ///
    /// An entry whose line number is not greater than the highest one seen
    /// so far is skipped with a warning. Retention is enforced per entry so
    /// the store never holds more than `max_line + 1` entries mid-batch.
    pub fn append(&mut self, incoming: impl IntoIterator<Item = LogEntry>) -> AppendOutcome {
        let mut outcome = AppendOutcome::default();

        for entry in incoming {
            let line = entry.line_number();
            if let Some(previous) = self.high_water {
                if line <= previous {
                    warn!(
                        line = %line,
                        previous = %previous,
                        "Skipping out-of-order log entry"
                    );
                    outcome
                        .skipped
                        .push(MalformedEntry::out_of_order(line, previous));
                    continue;
                }
            }

            self.high_water = Some(line);
            self.entries.push_back(entry);
            outcome.accepted += 1;
            outcome.evicted += self.enforce_retention();
        }

        if outcome.evicted > 0 {
            debug!(
                evicted = outcome.evicted,
                retained = self.entries.len(),
                "Retention evicted oldest entries"
            );
        }

        outcome
    }

    /// Swap the whole sequence.
    ///
    /// The replacement is validated exactly like an append onto an empty
    /// store, then retention applies.
    pub fn replace_all(&mut self, incoming: impl IntoIterator<Item = LogEntry>) -> AppendOutcome {
        self.clear();
        self.append(incoming)
    }

    /// Drop every entry and forget the ordering high-water mark.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.high_water = None;
    }

    /// Entries matching `filter`, in stored order.
    pub fn filtered_view(&self, filter: &ChunkFilter) -> FilteredView<'_> {
        let entries = if filter.is_pass_through() {
            self.entries.iter().collect()
        } else {
            self.entries.iter().filter(|e| filter.matches(e)).collect()
        };
        FilteredView::new(entries)
    }

    /// Retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retention ceiling.
    pub fn max_line(&self) -> usize {
        self.max_line
    }

    /// Retention policy.
    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// Line number of the newest retained entry.
    pub fn last_line_number(&self) -> Option<LineNumber> {
        self.entries.back().map(LogEntry::line_number)
    }

    /// Line number of the oldest retained entry.
    pub fn first_line_number(&self) -> Option<LineNumber> {
        self.entries.front().map(LogEntry::line_number)
    }

    /// All retained entries (oldest to newest).
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    fn enforce_retention(&mut self) -> usize {
        if self.retention == RetentionPolicy::Unbounded {
            return 0;
        }
        let mut evicted = 0;
        while self.entries.len() > self.max_line {
            self.entries.pop_front();
            evicted += 1;
        }
        evicted
    }
}
