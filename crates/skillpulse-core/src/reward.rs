//! Reward distribution: experience and loot for a successful pulse.
//!
//! Loot is granted item by item in loot order. An item the inventory cannot
//! hold is dropped at the actor's feet, owned by the actor, so nothing is
//! ever lost or duplicated. Partial placement is a normal outcome.

use skillpulse_actors::{ActorError, ActorState};
use skillpulse_types::{ItemPlacement, ItemStack, LootPlacement, Tick};
use tracing::{debug, info};

use crate::profile::ActionProfile;
use crate::services::GroundItems;

/// Grant every item in `loot` to `actor`, falling back to the ground.
///
/// Returns one [`LootPlacement`] per item, in loot order.
pub fn distribute(
    actor: &mut ActorState,
    loot: &[ItemStack],
    ground: &mut dyn GroundItems,
    tick: Tick,
) -> Vec<LootPlacement> {
    loot.iter()
        .map(|&item| {
            let placement = match actor.inventory.add(item) {
                Ok(()) => ItemPlacement::Inventory,
                Err(error) => {
                    debug!(
                        actor = %actor.id,
                        item = %item.id,
                        amount = item.amount,
                        %error,
                        "inventory rejected loot, dropping to ground"
                    );
                    ground.place(item, actor.location, actor.id, tick);
                    ItemPlacement::Ground {
                        location: actor.location,
                    }
                }
            };
            LootPlacement { item, placement }
        })
        .collect()
}

/// Add the profile's experience to the profile's skill.
///
/// Returns the new level if the actor levelled up.
///
/// # Errors
///
/// Returns [`ActorError::ArithmeticOverflow`] if the experience total
/// overflows.
pub fn grant_experience(
    actor: &mut ActorState,
    profile: &ActionProfile,
) -> Result<Option<u32>, ActorError> {
    let skill = profile.skill();
    let level_up = actor.skills.add_xp(skill, profile.experience())?;
    if let Some(level) = level_up {
        info!(actor = %actor.id, %skill, level, "actor levelled up");
    }
    Ok(level_up)
}
