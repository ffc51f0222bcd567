//! Viewer state machines (pure).
//!
//! Follow, jump and selection state, each testable without a terminal.

pub mod follow;
pub mod jump;
pub mod selection;

// Re-export for convenience
pub use follow::{FollowController, FollowState};
pub use jump::{JumpNavigator, JumpTicket, PendingJump};
pub use selection::SelectionManager;
