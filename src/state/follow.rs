//! Follow (live-tail) state machine.
//!
//! ```text
//!            request_follow()
//!   Idle  ───────────────────────▶  Following
//!     ▲                               │
//!     └───── scroll away from tail ───┤
//!     └───── jump_to() ───────────────┘
//! ```
//!
//! `replace_all` never transitions; the viewer only re-evaluates the window.

use crate::virtual_list::RenderWindow;
use tracing::debug;

/// Follow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowState {
    /// Appends leave the window and scroll offset alone.
    Idle,
    /// Appends pin the window to the newest entry.
    Following,
}

/// Decides whether the window tracks the tail.
#[derive(Debug, Clone)]
pub struct FollowController {
    state: FollowState,
}

impl FollowController {
    /// Initial state comes from the `follow` flag.
    pub fn new(follow: bool) -> Self {
        let state = if follow {
            FollowState::Following
        } else {
            FollowState::Idle
        };
        Self { state }
    }

    /// Current mode.
    pub fn state(&self) -> FollowState {
        self.state
    }

    /// `true` while tailing.
    pub fn is_following(&self) -> bool {
        self.state == FollowState::Following
    }

    /// Explicit request to resume tailing.
    ///
    /// Returns `true` if the state changed.
    pub fn request_follow(&mut self) -> bool {
        self.transition(FollowState::Following, "follow requested")
    }

    /// A user scroll landed on `landed`.
    ///
    /// Leaves `Following` unless the landing window lies inside
    /// `tail_window`, the window last rendered at the tail.
    /// Returns `true` if the state changed.
    pub fn on_user_scroll(&mut self, landed: RenderWindow, tail_window: RenderWindow) -> bool {
        if self.is_following() && !tail_window.encloses(&landed) {
            return self.transition(FollowState::Idle, "scrolled away from tail");
        }
        false
    }

    /// Explicit navigation overrides tailing.
    ///
    /// Returns `true` if the state changed.
    pub fn on_jump(&mut self) -> bool {
        self.transition(FollowState::Idle, "jump requested")
    }

    fn transition(&mut self, to: FollowState, cause: &'static str) -> bool {
        if self.state == to {
            return false;
        }
        debug!(from = ?self.state, to = ?to, cause, "Follow state changed");
        self.state = to;
        true
    }
}
