//! One-shot navigation to a line number.
//!
//! A jump is validated against the current filtered view, then held as
//! pending until the host reports the render settled. Only the newest
//! pending jump may complete: each request gets a fresh [`JumpTicket`] and
//! replaces any earlier one.

use crate::model::{LineNumber, NavigationError};
use crate::store::FilteredView;
use tracing::debug;

/// Identity of one jump request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JumpTicket(u64);

/// A validated jump waiting for its render to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingJump {
    /// Request identity.
    pub ticket: JumpTicket,
    /// Requested line.
    pub line: LineNumber,
    /// Position of `line` in the filtered view at request time.
    pub index: usize,
}

/// Tracks the single outstanding jump.
#[derive(Debug, Default)]
pub struct JumpNavigator {
    pending: Option<PendingJump>,
    next_ticket: u64,
}

impl JumpNavigator {
    /// A navigator with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `line` and make it the pending jump.
    ///
    /// A failed request leaves any earlier pending jump in place.
    ///
    /// # Errors
    ///
    /// `NavigationError::LineNotFound` if `line` is not in `view`.
    pub fn request(
        &mut self,
        line: LineNumber,
        view: &FilteredView<'_>,
    ) -> Result<PendingJump, NavigationError> {
        let index = view
            .position_of(line)
            .ok_or(NavigationError::LineNotFound { line })?;

        let ticket = JumpTicket(self.next_ticket);
        self.next_ticket += 1;

        if let Some(superseded) = self.pending.replace(PendingJump {
            ticket,
            line,
            index,
        }) {
            debug!(
                superseded = %superseded.line,
                line = %line,
                "Pending jump superseded"
            );
        }

        Ok(PendingJump {
            ticket,
            line,
            index,
        })
    }

    /// The render settled: take the pending jump, if any.
    pub fn settle(&mut self) -> Option<PendingJump> {
        self.pending.take()
    }

    /// Complete a specific jump.
    ///
    /// Returns `true` only if `ticket` is still the pending one; a
    /// superseded ticket is ignored.
    pub fn complete(&mut self, ticket: JumpTicket) -> bool {
        match self.pending {
            Some(pending) if pending.ticket == ticket => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Re-resolve the pending jump against a changed view.
    ///
    /// Updates the target index, or cancels the jump if its line is no
    /// longer in `view`.
    pub fn revalidate(&mut self, view: &FilteredView<'_>) -> Option<PendingJump> {
        let pending = self.pending.as_mut()?;
        match view.position_of(pending.line) {
            Some(index) => {
                pending.index = index;
                Some(*pending)
            }
            None => {
                let line = pending.line;
                self.cancel();
                debug!(line = %line, "Pending jump target left the view, cancelled");
                None
            }
        }
    }

    /// Drop the pending jump without completing it.
    pub fn cancel(&mut self) -> Option<PendingJump> {
        self.pending.take()
    }

    /// The outstanding jump, if any.
    pub fn pending(&self) -> Option<&PendingJump> {
        self.pending.as_ref()
    }
}
