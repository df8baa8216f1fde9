//! Failure penalty: stun, hit, and re-attempt cooldown.
//!
//! All three effects land together. Expiry ticks are computed before
//! anything is mutated, so an overflow leaves the actor untouched.

use serde::{Deserialize, Serialize};
use skillpulse_actors::{ActorError, ActorState};
use skillpulse_types::{EntityRef, StatusKind, Tick};
use tracing::debug;

use crate::profile::ActionProfile;
use crate::services::{Animation, Presentation, Sound};

/// Ticks the actor stays stunned after a failure.
pub const STUN_TICKS: u64 = 4;

/// Ticks before the actor may attempt the same skill again.
pub const COOLDOWN_TICKS: u64 = 4;

/// Animation played on the stunned actor.
pub const STUN_ANIMATION: Animation = Animation(424);

/// Sounds played to the stunned actor, in order.
pub const STUN_SOUNDS: [Sound; 2] = [Sound::once(1842), Sound::once(2727)];

/// What a failure did to the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEffects {
    /// Hitpoints actually removed.
    pub damage_dealt: u32,
    /// Tick at which the stun wears off.
    pub stunned_until: Tick,
    /// Tick before which the skill cannot be attempted again.
    pub cooldown_until: Tick,
}

/// Stun `actor`, hit it for the profile's stun damage, and put the profile's
/// skill on cooldown.
///
/// # Errors
///
/// Returns [`ActorError::ArithmeticOverflow`] if `tick` is too close to
/// `u64::MAX` to schedule the expiries. Nothing is applied in that case.
pub fn apply_failure(
    actor: &mut ActorState,
    profile: &ActionProfile,
    tick: Tick,
    presentation: &mut dyn Presentation,
) -> Result<FailureEffects, ActorError> {
    let cooldown_until = ensure_schedulable(tick)?;

    let stunned_until = actor.status.set(StatusKind::Stunned, tick, STUN_TICKS)?;
    actor.cooldowns.set(profile.skill(), cooldown_until);
    let damage_dealt = actor.hitpoints.apply_hit(profile.stun_damage());

    presentation.animate(EntityRef::Actor(actor.id), STUN_ANIMATION);
    for sound in STUN_SOUNDS {
        presentation.play_sound(actor.id, sound);
    }

    debug!(
        actor = %actor.id,
        profile = profile.name(),
        tick,
        damage_dealt,
        hitpoints = actor.hitpoints.current(),
        stunned_until,
        cooldown_until,
        "failure penalty applied"
    );

    Ok(FailureEffects {
        damage_dealt,
        stunned_until,
        cooldown_until,
    })
}

/// Check that a failure at `tick` can schedule its stun and cooldown.
/// Returns the cooldown expiry.
///
/// # Errors
///
/// Returns [`ActorError::ArithmeticOverflow`] if either expiry would pass
/// `u64::MAX`.
pub fn ensure_schedulable(tick: Tick) -> Result<Tick, ActorError> {
    expiry(tick, STUN_TICKS, "stun")?;
    expiry(tick, COOLDOWN_TICKS, "cooldown")
}

fn expiry(tick: Tick, ticks: u64, what: &str) -> Result<Tick, ActorError> {
    tick.checked_add(ticks)
        .ok_or_else(|| ActorError::ArithmeticOverflow {
            context: format!("{what} expiry overflow at tick {tick}"),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use skillpulse_types::{Location, Skill};

    use super::*;
    use crate::profile::ProfileTable;
    use crate::recording::{PresentationEvent, PresentationLog};

    fn knight() -> std::sync::Arc<ActionProfile> {
        ProfileTable::builtin().unwrap().require("knight").unwrap()
    }

    #[test]
    fn failure_applies_stun_hit_and_cooldown_together() {
        let profile = knight();
        let mut actor = ActorState::new("Tester", Location::new(0, 0, 0));
        let mut presentation = PresentationLog::new();

        let effects = apply_failure(&mut actor, &profile, 100, &mut presentation).unwrap();

        assert_eq!(effects.damage_dealt, 3);
        assert_eq!(effects.stunned_until, 104);
        assert_eq!(effects.cooldown_until, 104);
        assert_eq!(actor.hitpoints.current(), 7);
        assert!(actor.is_stunned(103));
        assert!(!actor.is_stunned(104));
        assert_eq!(actor.cooldowns.expiry(Skill::Thieving), Some(104));
    }

    #[test]
    fn failure_presents_stun() {
        let profile = knight();
        let mut actor = ActorState::new("Tester", Location::new(0, 0, 0));
        let mut presentation = PresentationLog::new();

        apply_failure(&mut actor, &profile, 5, &mut presentation).unwrap();

        assert!(presentation.has_animation(EntityRef::Actor(actor.id), STUN_ANIMATION));
        let sounds: Vec<u16> = presentation
            .events()
            .iter()
            .filter_map(|event| match event {
                PresentationEvent::Sound { sound, .. } => Some(sound.id),
                _ => None,
            })
            .collect();
        assert_eq!(sounds, vec![1842, 2727]);
    }

    #[test]
    fn hit_saturates_at_zero_hitpoints() {
        let profile = knight();
        let mut actor = ActorState::new("Tester", Location::new(0, 0, 0));
        actor.hitpoints.apply_hit(9);
        let mut presentation = PresentationLog::new();

        let effects = apply_failure(&mut actor, &profile, 5, &mut presentation).unwrap();

        assert_eq!(effects.damage_dealt, 1);
        assert!(actor.hitpoints.is_depleted());
    }

    #[test]
    fn overflowing_tick_changes_nothing() {
        let profile = knight();
        let mut actor = ActorState::new("Tester", Location::new(0, 0, 0));
        let before = actor.clone();
        let mut presentation = PresentationLog::new();

        let result = apply_failure(&mut actor, &profile, u64::MAX - 1, &mut presentation);

        assert!(matches!(result, Err(ActorError::ArithmeticOverflow { .. })));
        assert_eq!(actor, before);
        assert!(presentation.events().is_empty());
    }

    #[test]
    fn schedulable_up_to_four_ticks_before_max() {
        assert_eq!(ensure_schedulable(u64::MAX - 4).unwrap(), u64::MAX);
        assert!(ensure_schedulable(u64::MAX - 3).is_err());
    }
}
