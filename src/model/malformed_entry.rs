//! Records for log lines that could not be stored.
//!
//! Ingestion never fails as a whole: a line that is unparseable or out of
//! order becomes a `MalformedEntry`, gets logged, and is skipped.

use crate::model::LineNumber;
use std::fmt;

/// Why an incoming line was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// Line number is lower than the highest one already stored.
    OutOfOrder {
        /// Highest line number in the store when the entry arrived.
        previous: LineNumber,
    },
    /// Line number equals the highest one already stored.
    Duplicate,
    /// The raw line was not a valid entry.
    Unparseable {
        /// Parser error text.
        message: String,
    },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfOrder { previous } => {
                write!(f, "line number not greater than previous line {previous}")
            }
            Self::Duplicate => write!(f, "duplicate line number"),
            Self::Unparseable { message } => write!(f, "unparseable entry: {message}"),
        }
    }
}

/// A skipped log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedEntry {
    line_number: Option<LineNumber>,
    source_line: Option<usize>,
    reason: MalformedReason,
}

impl MalformedEntry {
    /// An entry that parsed but violated the ordering invariant.
    pub fn out_of_order(line_number: LineNumber, previous: LineNumber) -> Self {
        let reason = if line_number == previous {
            MalformedReason::Duplicate
        } else {
            MalformedReason::OutOfOrder { previous }
        };
        Self {
            line_number: Some(line_number),
            source_line: None,
            reason,
        }
    }

    /// A raw line that could not be parsed.
    ///
    /// # Arguments
    ///
    /// * `source_line` - 1-indexed position of the line in its input
    /// * `message` - Parser error text
    pub fn unparseable(source_line: usize, message: impl Into<String>) -> Self {
        Self {
            line_number: None,
            source_line: Some(source_line),
            reason: MalformedReason::Unparseable {
                message: message.into(),
            },
        }
    }

    /// The entry's own line number, when it got far enough to have one.
    pub fn line_number(&self) -> Option<LineNumber> {
        self.line_number
    }

    /// Position in the raw input, for unparseable lines.
    pub fn source_line(&self) -> Option<usize> {
        self.source_line
    }

    /// Why the line was skipped.
    pub fn reason(&self) -> &MalformedReason {
        &self.reason
    }
}
