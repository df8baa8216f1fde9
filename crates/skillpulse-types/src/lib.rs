//! Shared type definitions for the Skillpulse simulation.
//!
//! This crate is the single source of truth for the value types that flow
//! between the actor state crate, the pulse core, and the engine binary.
//!
//! # Modules
//!
//! - [`ids`] -- Typed identifiers for actors, entities, items and NPC kinds
//! - [`enums`] -- Skills, status kinds, diary regions, presentation addressing
//! - [`structs`] -- Locations, areas, item stacks, pulse resolution records

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{DiaryRegion, EntityRef, PulseMessageKind, Skill, StatusKind};
pub use ids::{ActorId, EntityId, ItemId, NpcTypeId};
pub use structs::{
    Area, ItemPlacement, ItemStack, Location, LootPlacement, PulseFailedDetails,
    PulseSucceededDetails, Tick,
};
