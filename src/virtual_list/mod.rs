//! Virtualization layer - bounded render windows over an unbounded list
//!
//! # Module Structure
//!
//! - `window`: RenderWindow, ViewportState, WindowPlan
//! - `size_index`: SizeIndex - O(log n) prefix sums via Fenwick tree
//! - `estimator`: ItemSizeEstimator - rows per entry
//! - `primitive`: VisibleRangeProvider - the external windowing capability
//! - `adapter`: VirtualizerAdapter - ceiling-respecting window computation

pub mod adapter;
pub mod estimator;
pub mod primitive;
pub mod size_index;
pub mod window;

pub use adapter::{JumpAlign, VirtualizerAdapter, DEFAULT_RENDERER_CEILING};
pub use estimator::{wrap_rows, ItemSizeEstimator};
pub use primitive::{FenwickRangeProvider, VisibleRangeProvider};
pub use size_index::SizeIndex;
pub use window::{RenderWindow, ViewportState, WindowPlan};
