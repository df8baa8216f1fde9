//! Actor and target state for the Skillpulse simulation.
//!
//! This crate holds the world-owned state that timed actions read and
//! mutate, with the operations on it -- everything that touches actor state
//! without touching I/O. It sits between `skillpulse-types` (plain values)
//! and `skillpulse-core` (the pulse lifecycle).
//!
//! # Modules
//!
//! - [`actor`] -- [`ActorState`], the acting player character
//! - [`cooldowns`] -- Per-skill re-attempt cooldowns ([`Cooldowns`])
//! - [`error`] -- Error types for actor operations ([`ActorError`])
//! - [`inventory`] -- Slot inventory with stacking ([`Inventory`])
//! - [`locks`] -- Interaction and movement locks ([`Locks`])
//! - [`skills`] -- Skill levels and experience ([`SkillSet`])
//! - [`status`] -- Timed status effects ([`StatusEffects`])
//! - [`target`] -- [`TargetState`], the NPC being acted upon
//! - [`vitals`] -- Hitpoints and direct damage ([`Hitpoints`])

pub mod actor;
pub mod cooldowns;
pub mod error;
pub mod inventory;
pub mod locks;
pub mod skills;
pub mod status;
pub mod target;
pub mod vitals;

// Re-export primary types at crate root for convenience.
pub use actor::ActorState;
pub use cooldowns::Cooldowns;
pub use error::ActorError;
pub use inventory::{DEFAULT_INVENTORY_SLOTS, Inventory};
pub use locks::Locks;
pub use skills::{MAX_SKILL_LEVEL, SkillSet};
pub use status::StatusEffects;
pub use target::TargetState;
pub use vitals::Hitpoints;
