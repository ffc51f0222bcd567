//! Chunk storage: the ordered, retention-bounded entry sequence.

pub mod chunk_store;
pub mod filter;

pub use chunk_store::{AppendOutcome, ChunkStore, RetentionPolicy};
pub use filter::{ChunkFilter, FilteredView};
