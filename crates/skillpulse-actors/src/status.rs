//! Timed status effects.
//!
//! Effects store the tick at which they expire rather than a countdown, so
//! nothing has to decrement them each tick. An effect is active while
//! `current_tick < expires_at`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use skillpulse_types::{StatusKind, Tick};

use crate::error::ActorError;

/// Active status effects on an actor, keyed by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffects {
    effects: BTreeMap<StatusKind, Tick>,
}

impl StatusEffects {
    /// No active effects.
    pub const fn new() -> Self {
        Self {
            effects: BTreeMap::new(),
        }
    }

    /// Apply `kind` for `duration` ticks starting at `now`.
    ///
    /// Re-applying an effect replaces its expiry, even if the new one is
    /// sooner. Returns the new expiry tick.
    pub fn set(&mut self, kind: StatusKind, now: Tick, duration: u64) -> Result<Tick, ActorError> {
        let expires_at = now
            .checked_add(duration)
            .ok_or_else(|| ActorError::ArithmeticOverflow {
                context: format!("status {kind:?} expiry overflow"),
            })?;
        self.effects.insert(kind, expires_at);
        Ok(expires_at)
    }

    /// Whether `kind` is in effect at `now`.
    pub fn is_active(&self, kind: StatusKind, now: Tick) -> bool {
        self.expires_at(kind).is_some_and(|expiry| expiry > now)
    }

    /// The expiry tick recorded for `kind`, active or not.
    pub fn expires_at(&self, kind: StatusKind) -> Option<Tick> {
        self.effects.get(&kind).copied()
    }

    /// Drop every effect that has expired by `now`.
    pub fn prune(&mut self, now: Tick) {
        self.effects.retain(|_, expiry| *expiry > now);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn stun_lasts_exactly_duration() {
        let mut status = StatusEffects::new();
        let expiry = status.set(StatusKind::Stunned, 10, 4).unwrap();
        assert_eq!(expiry, 14);
        assert!(status.is_active(StatusKind::Stunned, 10));
        assert!(status.is_active(StatusKind::Stunned, 13));
        assert!(!status.is_active(StatusKind::Stunned, 14));
    }

    #[test]
    fn reapply_replaces_expiry() {
        let mut status = StatusEffects::new();
        status.set(StatusKind::Stunned, 10, 4).unwrap();
        status.set(StatusKind::Stunned, 12, 1).unwrap();
        assert_eq!(status.expires_at(StatusKind::Stunned), Some(13));
    }

    #[test]
    fn prune_removes_expired() {
        let mut status = StatusEffects::new();
        status.set(StatusKind::Stunned, 0, 4).unwrap();
        status.prune(3);
        assert!(status.expires_at(StatusKind::Stunned).is_some());
        status.prune(4);
        assert!(status.expires_at(StatusKind::Stunned).is_none());
    }

    #[test]
    fn expiry_overflow_is_an_error() {
        let mut status = StatusEffects::new();
        assert!(status.set(StatusKind::Stunned, Tick::MAX, 1).is_err());
    }
}
