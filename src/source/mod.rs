//! Log input sources.
//!
//! Sources hand out raw JSONL lines; parsing happens in
//! [`integration::process_lines`](crate::integration::process_lines).

pub mod file;

pub use file::{LogFileSource, SourceUpdate};
