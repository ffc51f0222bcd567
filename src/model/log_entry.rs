//! Log entry types representing one line of execution output.
//!
//! A `LogEntry` is the unit stored in a chunk. Only `line_number`, `node`
//! and `step_ctx` carry meaning for the viewer; everything else is passed
//! through to whoever renders the entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::fmt;

// ===== LineNumber =====

/// Line number of an entry within its chunk.
///
/// Unique and strictly increasing in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(transparent)]
pub struct LineNumber(u64);

impl LineNumber {
    /// Create a line number from its raw value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for LineNumber {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ===== LogEntry =====

/// A single execution log line.
///
/// Deserializes from the camelCase JSON shape emitted by the execution
/// backend (`lineNumber`, `logHtml`, `stepCtx`, `executionOutput`, ...).
/// `log_html`, `execution_output` and `meta` are opaque and never inspected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    line_number: LineNumber,
    #[serde(default)]
    log: String,
    #[serde(default)]
    log_html: Option<String>,
    #[serde(default, deserialize_with = "lenient_time")]
    time: Option<DateTime<Utc>>,
    #[serde(default)]
    node: Option<String>,
    #[serde(default)]
    step_ctx: Option<String>,
    #[serde(default)]
    level: String,
    #[serde(default)]
    execution_output: serde_json::Value,
    #[serde(default)]
    meta: serde_json::Value,
}

impl LogEntry {
    /// Create an entry with the given line number and text.
    ///
    /// Remaining fields start empty; use the `with_*` builders to fill them.
    pub fn new(line_number: impl Into<LineNumber>, log: impl Into<String>) -> Self {
        Self {
            line_number: line_number.into(),
            log: log.into(),
            log_html: None,
            time: None,
            node: None,
            step_ctx: None,
            level: String::new(),
            execution_output: serde_json::Value::Null,
            meta: serde_json::Value::Null,
        }
    }

    /// Set the originating node.
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }

    /// Set the originating step context.
    pub fn with_step_ctx(mut self, step_ctx: impl Into<String>) -> Self {
        self.step_ctx = Some(step_ctx.into());
        self
    }

    /// Set the severity tag.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Set the emission time.
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Set the pre-rendered markup.
    pub fn with_log_html(mut self, html: impl Into<String>) -> Self {
        self.log_html = Some(html.into());
        self
    }

    /// Attach side-channel payloads.
    pub fn with_payloads(mut self, execution_output: serde_json::Value, meta: serde_json::Value) -> Self {
        self.execution_output = execution_output;
        self.meta = meta;
        self
    }

    // ===== Accessors (read-only) =====

    /// Source line number.
    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    /// Plain log text.
    pub fn log(&self) -> &str {
        &self.log
    }

    /// Pre-rendered HTML, when the backend sent one.
    pub fn log_html(&self) -> Option<&str> {
        self.log_html.as_deref()
    }

    /// Timestamp, when present and parseable.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    /// Node the line came from.
    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    /// Step context, e.g. `1/compile`.
    pub fn step_ctx(&self) -> Option<&str> {
        self.step_ctx.as_deref()
    }

    /// Log level; empty when absent.
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Execution-output payload, `Null` when absent.
    pub fn execution_output(&self) -> &serde_json::Value {
        &self.execution_output
    }

    /// Opaque metadata object.
    pub fn meta(&self) -> &serde_json::Value {
        &self.meta
    }
}

/// Accept RFC 3339 timestamps and treat anything else as absent.
///
/// Backends emit both absolute timestamps and bare clock times; only the
/// former can be placed on a timeline, and a bad `time` must not reject the
/// whole line.
fn lenient_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }))
}

// ===== Tests =====
