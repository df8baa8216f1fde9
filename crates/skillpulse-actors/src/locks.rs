//! Interaction and movement locks.
//!
//! A lock holds until a tick; it is released once the clock reaches that
//! tick, or early via the explicit unlock calls.

use serde::{Deserialize, Serialize};
use skillpulse_types::Tick;

/// Lock state for one entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locks {
    interaction_until: Tick,
    movement_until: Tick,
}

impl Locks {
    /// Unlocked.
    pub const fn new() -> Self {
        Self {
            interaction_until: 0,
            movement_until: 0,
        }
    }

    /// Lock both interaction and movement for `ticks` ticks from `now`.
    pub fn lock(&mut self, now: Tick, ticks: u64) {
        self.lock_interaction(now, ticks);
        self.lock_movement(now, ticks);
    }

    /// Lock interaction for `ticks` ticks from `now`. Never shortens an
    /// existing lock.
    pub fn lock_interaction(&mut self, now: Tick, ticks: u64) {
        let until = now.saturating_add(ticks);
        self.interaction_until = self.interaction_until.max(until);
    }

    /// Lock movement for `ticks` ticks from `now`. Never shortens an
    /// existing lock.
    pub fn lock_movement(&mut self, now: Tick, ticks: u64) {
        let until = now.saturating_add(ticks);
        self.movement_until = self.movement_until.max(until);
    }

    /// Release the interaction lock immediately.
    pub const fn unlock_interaction(&mut self) {
        self.interaction_until = 0;
    }

    /// Whether interaction is locked at `now`.
    pub const fn is_interaction_locked(&self, now: Tick) -> bool {
        self.interaction_until > now
    }

    /// Whether movement is locked at `now`.
    pub const fn is_movement_locked(&self, now: Tick) -> bool {
        self.movement_until > now
    }
}
