//! Domain model types (pure).
//!
//! All types in this module are plain data with smart constructors.

pub mod error;
pub mod log_entry;
pub mod malformed_entry;

// Re-export for convenience
pub use error::{AppError, InputError, NavigationError};
pub use log_entry::{LineNumber, LogEntry};
pub use malformed_entry::{MalformedEntry, MalformedReason};
