//! Error types for the skillpulse-actors crate.
//!
//! Inventory and skill operations return typed errors rather than
//! panicking. A full inventory is an expected outcome that callers branch
//! on; arithmetic overflow indicates corrupted state.

use skillpulse_types::ItemStack;

/// Errors that can occur during actor state operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActorError {
    /// The inventory has no free slot and no stack that can absorb the item.
    #[error("inventory full: cannot hold {amount} of item {item_id} ({free_slots} free slots)", item_id = .item.id, amount = .item.amount)]
    InventoryFull {
        /// The item the caller attempted to add.
        item: ItemStack,
        /// Free slots at the time of the attempt.
        free_slots: usize,
    },

    /// An arithmetic overflow occurred while updating actor state.
    #[error("arithmetic overflow in actor state: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
