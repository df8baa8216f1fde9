//! Core value structs: positions, items, and pulse resolution records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{ActorId, EntityId, ItemId};

/// A simulation tick number. Ticks only ever move forward.
pub type Tick = u64;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A tile position in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// West-east coordinate.
    pub x: i32,
    /// South-north coordinate.
    pub y: i32,
    /// Height level (0 is ground floor).
    pub plane: u8,
}

impl Location {
    /// Create a location from its coordinates.
    pub const fn new(x: i32, y: i32, plane: u8) -> Self {
        Self { x, y, plane }
    }
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.plane)
    }
}

/// An axis-aligned rectangle of tiles on a single plane, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Area {
    /// Lowest x inside the area.
    pub south_west_x: i32,
    /// Lowest y inside the area.
    pub south_west_y: i32,
    /// Highest x inside the area.
    pub north_east_x: i32,
    /// Highest y inside the area.
    pub north_east_y: i32,
    /// The plane the area lies on.
    pub plane: u8,
}

impl Area {
    /// Create an area from its corners.
    pub const fn new(
        south_west_x: i32,
        south_west_y: i32,
        north_east_x: i32,
        north_east_y: i32,
        plane: u8,
    ) -> Self {
        Self {
            south_west_x,
            south_west_y,
            north_east_x,
            north_east_y,
            plane,
        }
    }

    /// Whether `location` lies inside the area.
    pub const fn contains(&self, location: Location) -> bool {
        location.plane == self.plane
            && location.x >= self.south_west_x
            && location.x <= self.north_east_x
            && location.y >= self.south_west_y
            && location.y <= self.north_east_y
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// A quantity of one item kind.
///
/// Stackable items (coins, seeds) share one inventory slot regardless of
/// amount; everything else takes one slot per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item definition.
    pub id: ItemId,
    /// How many units.
    pub amount: u32,
    /// Whether units of this item share a slot.
    pub stackable: bool,
}

impl ItemStack {
    /// A stackable item (e.g. coins).
    pub const fn stackable(id: ItemId, amount: u32) -> Self {
        Self {
            id,
            amount,
            stackable: true,
        }
    }

    /// A non-stackable item.
    pub const fn single(id: ItemId, amount: u32) -> Self {
        Self {
            id,
            amount,
            stackable: false,
        }
    }
}

/// Where a rewarded item ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemPlacement {
    /// Added to the actor's inventory.
    Inventory,
    /// Dropped on the ground at the actor's location, owned by the actor.
    Ground {
        /// Where the item was dropped.
        location: Location,
    },
}

/// One rewarded item and its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootPlacement {
    /// The item granted.
    pub item: ItemStack,
    /// Where it went.
    pub placement: ItemPlacement,
}

// ---------------------------------------------------------------------------
// Pulse resolution records
// ---------------------------------------------------------------------------

/// Details of a pulse that resolved in the actor's favour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseSucceededDetails {
    /// The acting actor.
    pub actor_id: ActorId,
    /// The entity acted upon.
    pub target_id: EntityId,
    /// Name of the action profile that ran.
    pub profile: String,
    /// Tick on which the pulse resolved.
    pub tick: Tick,
    /// Experience granted.
    pub experience: Decimal,
    /// New skill level, if the experience caused a level-up.
    pub level_up: Option<u32>,
    /// Every item granted, in loot order.
    pub loot: Vec<LootPlacement>,
}

/// Details of a pulse that resolved against the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseFailedDetails {
    /// The acting actor.
    pub actor_id: ActorId,
    /// The entity acted upon.
    pub target_id: EntityId,
    /// Tick on which the pulse resolved.
    pub tick: Tick,
    /// Hitpoints actually removed by the penalty hit.
    pub damage_dealt: u32,
    /// Tick at which the stun wears off.
    pub stunned_until: Tick,
    /// Tick before which the actor may not try again.
    pub cooldown_until: Tick,
}
