//! Actor state: the player-side participant in a timed action.
//!
//! An [`ActorState`] is owned by the world. Pulses borrow it mutably for the
//! duration of a single tick callback and never hold on to it between ticks.

use serde::{Deserialize, Serialize};
use skillpulse_types::{ActorId, Location, Skill, StatusKind, Tick};

use crate::cooldowns::Cooldowns;
use crate::inventory::Inventory;
use crate::locks::Locks;
use crate::skills::SkillSet;
use crate::status::StatusEffects;
use crate::vitals::Hitpoints;

/// Everything the pulse core needs to know about, and may change on, an
/// actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorState {
    /// Unique identifier.
    pub id: ActorId,
    /// Display name.
    pub name: String,
    /// Current tile.
    pub location: Location,
    /// Skill levels and experience.
    pub skills: SkillSet,
    /// Carried items.
    pub inventory: Inventory,
    /// Timed status effects (stun).
    pub status: StatusEffects,
    /// Interaction and movement locks.
    pub locks: Locks,
    /// Per-skill re-attempt cooldowns.
    pub cooldowns: Cooldowns,
    /// Health pool.
    pub hitpoints: Hitpoints,
    /// Tick until which the actor counts as in combat.
    pub in_combat_until: Tick,
}

impl ActorState {
    /// Spawn a fresh actor with default skills and a standard inventory.
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        let skills = SkillSet::new();
        let hitpoints = Hitpoints::full(skills.level(Skill::Hitpoints));
        Self {
            id: ActorId::new(),
            name: name.into(),
            location,
            skills,
            inventory: Inventory::default(),
            status: StatusEffects::new(),
            locks: Locks::new(),
            cooldowns: Cooldowns::new(),
            hitpoints,
            in_combat_until: 0,
        }
    }

    /// Replace the inventory (e.g. to spawn with a smaller bag).
    #[must_use]
    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    /// Whether the actor is engaged in combat at `now`.
    pub const fn in_combat(&self, now: Tick) -> bool {
        self.in_combat_until > now
    }

    /// Mark the actor as engaged in combat for `ticks` ticks from `now`.
    pub fn enter_combat(&mut self, now: Tick, ticks: u64) {
        self.in_combat_until = self.in_combat_until.max(now.saturating_add(ticks));
    }

    /// Whether the actor is stunned at `now`.
    pub fn is_stunned(&self, now: Tick) -> bool {
        self.status.is_active(StatusKind::Stunned, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_actor_defaults() {
        let actor = ActorState::new("Zezima", Location::new(3222, 3218, 0));
        assert_eq!(actor.skills.level(Skill::Thieving), 1);
        assert_eq!(actor.hitpoints.current(), 10);
        assert_eq!(actor.inventory.capacity(), 28);
        assert!(!actor.in_combat(0));
        assert!(!actor.is_stunned(0));
    }

    #[test]
    fn combat_window_expires() {
        let mut actor = ActorState::new("Zezima", Location::new(0, 0, 0));
        actor.enter_combat(10, 8);
        assert!(actor.in_combat(17));
        assert!(!actor.in_combat(18));
    }

    #[test]
    fn with_inventory_replaces_bag() {
        let actor = ActorState::new("Zezima", Location::new(0, 0, 0))
            .with_inventory(Inventory::new(4));
        assert_eq!(actor.inventory.capacity(), 4);
    }
}
