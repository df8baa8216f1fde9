//! Enumeration types shared by the actor, core and engine crates.

use serde::{Deserialize, Serialize};

use crate::ids::{ActorId, EntityId};

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

/// A skill channel an actor has a level and experience in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    /// Melee accuracy.
    Attack,
    /// Damage reduction.
    Defence,
    /// Melee damage.
    Strength,
    /// Health pool.
    Hitpoints,
    /// Pickpocketing and stall theft.
    Thieving,
    /// Shortcuts and run energy.
    Agility,
}

impl Skill {
    /// Every skill channel, in display order.
    pub const ALL: [Self; 6] = [
        Self::Attack,
        Self::Defence,
        Self::Strength,
        Self::Hitpoints,
        Self::Thieving,
        Self::Agility,
    ];

    /// Lower-case display name used in player-facing messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Defence => "defence",
            Self::Strength => "strength",
            Self::Hitpoints => "hitpoints",
            Self::Thieving => "thieving",
            Self::Agility => "agility",
        }
    }
}

impl core::fmt::Display for Skill {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Status effects
// ---------------------------------------------------------------------------

/// Timed conditions the world can place on an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Cannot act or move until the effect expires.
    Stunned,
}

// ---------------------------------------------------------------------------
// Achievement diaries
// ---------------------------------------------------------------------------

/// Region whose achievement diary a milestone belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiaryRegion {
    /// Ardougne diary.
    Ardougne,
    /// Falador diary.
    Falador,
    /// Karamja diary.
    Karamja,
    /// Lumbridge diary.
    Lumbridge,
    /// Varrock diary.
    Varrock,
}

// ---------------------------------------------------------------------------
// Pulse messaging
// ---------------------------------------------------------------------------

/// The kinds of lifecycle message a pulse can be asked to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseMessageKind {
    /// Sent once when the action visibly begins.
    Start,
}

// ---------------------------------------------------------------------------
// Presentation addressing
// ---------------------------------------------------------------------------

/// Either side of an interaction, for presentation effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    /// An actor (player character).
    Actor(ActorId),
    /// A targetable world entity.
    Target(EntityId),
}
