//! Error types for the execution log viewer.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error for the binary, wrapping every fatal failure
//!   - [`InputError`] - Log file reading failures
//!   - [`ConfigError`](crate::config::ConfigError) - Config file read/parse failures
//!   - [`LoggingError`](crate::logging::LoggingError) - Tracing setup failures
//!   - `std::io::Error` - Terminal failures
//! - [`NavigationError`] - Returned synchronously from `jump_to`, never fatal
//!
//! # Error Recovery Strategy
//!
//! Ingestion problems are **not** errors here: an out-of-order or unparseable
//! line becomes a [`MalformedEntry`](crate::model::MalformedEntry), is logged
//! at warn level, and is skipped. Navigation failures are reported to the
//! caller and leave the viewport untouched. Nothing in the core aborts a render.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::model::LineNumber;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all fatal failure modes.
///
/// Domain errors convert via `From`, so `?` composes through `main`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read log input.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// Configuration file exists but could not be used.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing subscriber could not be set up.
    #[error("Logging setup failed: {0}")]
    Logging(#[from] LoggingError),

    /// Terminal or TUI rendering error.
    ///
    /// Raised by the crossterm/ratatui layer. Fatal: the terminal is restored
    /// and the process exits.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors encountered when reading log input.
#[derive(Debug, Error)]
pub enum InputError {
    /// The log file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use exlv::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.jsonl")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.jsonl"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// Any other I/O failure while opening or reading the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failed navigation request.
///
/// Returned to the caller of `jump_to`. No scroll is performed and no
/// `jumped` event is published.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The requested line is not part of the current filtered view.
    ///
    /// Either it never existed, was evicted by retention, or is hidden by
    /// the node/step filter.
    #[error("Line {line} not found in current view")]
    LineNotFound {
        /// The requested line number.
        line: LineNumber,
    },
}
