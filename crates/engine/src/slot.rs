//! Cancellation slots: one in-flight operation per logical unit.
//!
//! Each report view runs two independent slots (table rows, aggregate
//! stats); a consolidated merge runs its own. Starting a new operation
//! cancels the incumbent *before* dispatch, and every operation carries
//! its private token: a cancel-then-immediately-start race can never
//! clear the token of the operation that superseded it.

use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Holder of the current operation's cancellation token for one slot.
#[derive(Debug)]
pub struct Slot {
    current: Mutex<CancellationToken>,
}

impl Slot {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(CancellationToken::new()),
        }
    }

    /// Supersede the in-flight operation and install a fresh token for
    /// the next one. The returned token belongs to exactly one operation.
    pub fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        current.cancel();
        *current = token.clone();
        token
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::new()
    }
}
