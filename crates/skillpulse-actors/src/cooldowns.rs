//! Per-skill re-attempt cooldowns.
//!
//! A failed attempt blocks further attempts in the same skill channel until
//! an expiry tick. The check is strict: the actor is cooling down while
//! `expiry > now`, and may act again on the expiry tick itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use skillpulse_types::{Skill, Tick};

/// Map from skill channel to the tick its cooldown ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldowns {
    expiries: BTreeMap<Skill, Tick>,
}

impl Cooldowns {
    /// No cooldowns.
    pub const fn new() -> Self {
        Self {
            expiries: BTreeMap::new(),
        }
    }

    /// Record that `skill` may not be used again before `until`.
    pub fn set(&mut self, skill: Skill, until: Tick) {
        self.expiries.insert(skill, until);
    }

    /// Expiry tick for `skill`, if one was ever set.
    pub fn expiry(&self, skill: Skill) -> Option<Tick> {
        self.expiries.get(&skill).copied()
    }

    /// The expiry tick for `skill` if it is still cooling down at `now`.
    pub fn active_until(&self, skill: Skill, now: Tick) -> Option<Tick> {
        self.expiry(skill).filter(|&until| until > now)
    }
}
