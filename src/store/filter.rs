//! Node / step-context filtering over a chunk.

use crate::model::{LineNumber, LogEntry};
use std::ops::Range;

/// Filter predicates applied to a chunk.
///
/// An unset predicate matches every entry. A set predicate requires an exact
/// match; an entry that lacks the field does not match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkFilter {
    node: Option<String>,
    step_ctx: Option<String>,
}

impl ChunkFilter {
    /// A filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to entries from `node`.
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }

    /// Restrict to entries from `step_ctx`.
    pub fn with_step_ctx(mut self, step_ctx: impl Into<String>) -> Self {
        self.step_ctx = Some(step_ctx.into());
        self
    }

    /// Required node, if any.
    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    /// Required step context, if any.
    pub fn step_ctx(&self) -> Option<&str> {
        self.step_ctx.as_deref()
    }

    /// True when neither predicate is set.
    pub fn is_pass_through(&self) -> bool {
        self.node.is_none() && self.step_ctx.is_none()
    }

    /// Check a single entry against both predicates.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        let node_ok = match self.node.as_deref() {
            None => true,
            Some(wanted) => entry.node() == Some(wanted),
        };
        let step_ok = match self.step_ctx.as_deref() {
            None => true,
            Some(wanted) => entry.step_ctx() == Some(wanted),
        };
        node_ok && step_ok
    }
}

/// Borrowed, filtered snapshot of a chunk in stored order.
///
/// Indices into a `FilteredView` are the coordinate system of the
/// virtualizer: windows, scroll targets and jump positions all refer to them.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    entries: Vec<&'a LogEntry>,
}

impl<'a> FilteredView<'a> {
    pub(crate) fn new(entries: Vec<&'a LogEntry>) -> Self {
        Self { entries }
    }

    /// Entries passing the filter.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at filtered `index`.
    pub fn get(&self, index: usize) -> Option<&'a LogEntry> {
        self.entries.get(index).copied()
    }

    /// Index of `line` within the view.
    ///
    /// Binary search: the view inherits the store's ascending order.
    pub fn position_of(&self, line: LineNumber) -> Option<usize> {
        self.entries
            .binary_search_by_key(&line, |entry| entry.line_number())
            .ok()
    }

    /// Entries inside `range`, clamped to the view bounds.
    pub fn slice(&self, range: Range<usize>) -> &[&'a LogEntry] {
        let end = range.end.min(self.entries.len());
        let start = range.start.min(end);
        &self.entries[start..end]
    }

    /// Entries in line order.
    pub fn iter(&self) -> impl Iterator<Item = &'a LogEntry> + '_ {
        self.entries.iter().copied()
    }
}
