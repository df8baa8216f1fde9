//! Target state: the world entity an actor acts upon.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use skillpulse_types::{ActorId, EntityId, Location, NpcTypeId};

use crate::locks::Locks;

/// A spawned NPC that can be the target of a timed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetState {
    /// Unique spawn identifier.
    pub id: EntityId,
    /// NPC definition this spawn was created from.
    pub npc_type: NpcTypeId,
    /// Display name ("Guard", "Man").
    pub name: String,
    /// Current tile.
    pub location: Location,
    /// False once the NPC has died and not yet respawned.
    pub alive: bool,
    /// False while the NPC is despawned or otherwise unregistered.
    pub active: bool,
    /// Whether the NPC has queued movement.
    pub walking: bool,
    /// Movement locks.
    pub locks: Locks,
    hidden_from: BTreeSet<ActorId>,
}

impl TargetState {
    /// Spawn a live, active target.
    pub fn new(npc_type: NpcTypeId, name: impl Into<String>, location: Location) -> Self {
        Self {
            id: EntityId::new(),
            npc_type,
            name: name.into(),
            location,
            alive: true,
            active: true,
            walking: false,
            locks: Locks::new(),
            hidden_from: BTreeSet::new(),
        }
    }

    /// Whether the target is dead.
    pub const fn is_dead(&self) -> bool {
        !self.alive
    }

    /// Whether the target is registered in the world.
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether `actor` cannot see this target.
    pub fn is_hidden_from(&self, actor: ActorId) -> bool {
        self.hidden_from.contains(&actor)
    }

    /// Hide the target from one actor (instanced or quest-gated spawns).
    pub fn hide_from(&mut self, actor: ActorId) {
        self.hidden_from.insert(actor);
    }

    /// Whether `actor` can currently interact with the target at all.
    pub fn is_available_to(&self, actor: ActorId) -> bool {
        !self.is_dead() && self.is_active() && !self.is_hidden_from(actor)
    }

    /// Drop any queued movement.
    pub const fn reset_walking_queue(&mut self) {
        self.walking = false;
    }
}
