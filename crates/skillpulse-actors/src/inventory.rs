//! Slot-based actor inventory.
//!
//! An inventory has a fixed number of slots. Stackable items occupy one
//! slot per item kind no matter the amount; non-stackable items occupy one
//! slot per unit. Additions are all-or-nothing: either the whole stack fits
//! or the inventory is left untouched and [`ActorError::InventoryFull`] is
//! returned, so callers can fall back to dropping the item.

use serde::{Deserialize, Serialize};
use skillpulse_types::{ItemId, ItemStack};

use crate::error::ActorError;

/// Slot count of a standard backpack.
pub const DEFAULT_INVENTORY_SLOTS: usize = 28;

/// A fixed-capacity collection of item stacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
}

impl Inventory {
    /// Create an empty inventory with `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of empty slots.
    pub fn free_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    /// Whether every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.free_slots() == 0
    }

    /// Total units held of the given item across all slots.
    pub fn count(&self, id: ItemId) -> u64 {
        self.items()
            .filter(|stack| stack.id == id)
            .map(|stack| u64::from(stack.amount))
            .sum()
    }

    /// Iterate over the occupied slots in slot order.
    pub fn items(&self) -> impl Iterator<Item = &ItemStack> {
        self.slots.iter().flatten()
    }

    /// Whether `item` could be added in full right now.
    pub fn has_space_for(&self, item: &ItemStack) -> bool {
        if item.amount == 0 {
            return true;
        }
        if item.stackable {
            if let Some(existing) = self.find_stack(item.id) {
                return existing.amount.checked_add(item.amount).is_some();
            }
            return !self.is_full();
        }
        usize::try_from(item.amount).is_ok_and(|needed| needed <= self.free_slots())
    }

    /// Add `item` to the inventory.
    ///
    /// Stackable items merge into an existing stack of the same kind when
    /// one exists, otherwise take a free slot. Non-stackable items take one
    /// free slot per unit.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::InventoryFull`] if the item does not fit; the
    /// inventory is unchanged in that case.
    pub fn add(&mut self, item: ItemStack) -> Result<(), ActorError> {
        if !self.has_space_for(&item) {
            return Err(ActorError::InventoryFull {
                item,
                free_slots: self.free_slots(),
            });
        }
        if item.amount == 0 {
            return Ok(());
        }

        if item.stackable {
            if let Some(existing) = self.find_stack_mut(item.id) {
                existing.amount = existing.amount.checked_add(item.amount).ok_or_else(|| {
                    ActorError::ArithmeticOverflow {
                        context: format!("stack overflow for item {}", item.id),
                    }
                })?;
                return Ok(());
            }
            return self.place_in_free_slot(item);
        }

        for _ in 0..item.amount {
            self.place_in_free_slot(ItemStack::single(item.id, 1))?;
        }
        Ok(())
    }

    fn find_stack(&self, id: ItemId) -> Option<&ItemStack> {
        self.items().find(|stack| stack.stackable && stack.id == id)
    }

    fn find_stack_mut(&mut self, id: ItemId) -> Option<&mut ItemStack> {
        self.slots
            .iter_mut()
            .flatten()
            .find(|stack| stack.stackable && stack.id == id)
    }

    fn place_in_free_slot(&mut self, item: ItemStack) -> Result<(), ActorError> {
        let free_slots = self.free_slots();
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.is_none())
            .ok_or(ActorError::InventoryFull { item, free_slots })?;
        *slot = Some(item);
        Ok(())
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(DEFAULT_INVENTORY_SLOTS)
    }
}
