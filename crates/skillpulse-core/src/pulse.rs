//! The action pulse: one actor's timed attempt against one target.
//!
//! Lifecycle:
//!
//! ```text
//! NotStarted --check_requirements--> Ready --reward--> Running --reward (3rd)--> Terminated
//!      |                                |                  |
//!      +----------------stop------------+--------stop------+---------------> Terminated(Cancelled)
//! ```
//!
//! Requirements are checked once. After that the scheduler calls
//! [`ActionPulse::reward`] once per tick; only every third call evaluates
//! the attempt, and the pulse always terminates on that first evaluation.
//!
//! The pulse never owns actor or target state. Both are borrowed for the
//! duration of a single call, together with the collaborators bundled in
//! [`PulseEnv`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use skillpulse_actors::{ActorError, ActorState, TargetState};
use skillpulse_types::{
    ActorId, EntityId, EntityRef, PulseFailedDetails, PulseMessageKind, PulseSucceededDetails,
    Tick,
};
use tracing::{debug, info};

use crate::dice::RollSource;
use crate::penalty;
use crate::profile::{ActionProfile, render_template};
use crate::reward;
use crate::services::{
    AchievementTracker, Animation, GroundItems, MessageSink, Presentation, TickClock,
};
use crate::success;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Evaluation fires on every call whose elapsed count is a multiple of this.
pub const CADENCE: u64 = 3;

/// Animation played by the actor on the first tick.
pub const PERFORM_ANIMATION: Animation = Animation(881);

/// Animation played by the target when it catches the actor.
pub const RETALIATION_ANIMATION: Animation = Animation(422);

const START_FACE_TICKS: u64 = 2;
const START_LOCK_TICKS: u64 = 1;
const RETALIATION_FACE_TICKS: u64 = 1;

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Everything outside actor and target state a pulse may touch in one call.
pub struct PulseEnv<'a> {
    /// Current tick.
    pub clock: &'a dyn TickClock,
    /// Random draws for success and loot.
    pub rolls: &'a mut dyn RollSource,
    /// Ground-item fallback for loot.
    pub ground: &'a mut dyn GroundItems,
    /// Animations, facing, sounds, overhead chat.
    pub presentation: &'a mut dyn Presentation,
    /// Chatbox messages.
    pub messages: &'a mut dyn MessageSink,
    /// Diary progress.
    pub achievements: &'a mut dyn AchievementTracker,
}

// ---------------------------------------------------------------------------
// Phases and results
// ---------------------------------------------------------------------------

/// How a pulse ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseOutcome {
    /// The attempt succeeded and rewards were granted.
    Succeeded,
    /// The attempt failed and the penalty was applied.
    Failed,
    /// The pulse was stopped before resolving.
    Cancelled,
}

/// Lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "outcome", rename_all = "snake_case")]
pub enum PulsePhase {
    /// Requirements have not been checked yet.
    NotStarted,
    /// Requirements passed; no tick has run.
    Ready,
    /// At least one tick has run.
    Running,
    /// Finished. No further calls have any effect.
    Terminated(PulseOutcome),
}

impl PulsePhase {
    /// Whether the pulse has finished.
    pub const fn is_terminated(self) -> bool {
        matches!(self, Self::Terminated(_))
    }
}

/// Why an attempt could not start. The message is what the actor is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The target is dead, despawned, or hidden from the actor.
    #[error("You can't reach that.")]
    TargetUnavailable,

    /// The actor is still recovering from a failed attempt.
    #[error("You need to recover before trying again.")]
    CoolingDown {
        /// Tick the cooldown expires.
        until: Tick,
    },

    /// The actor is fighting.
    #[error("You can't pickpocket during combat.")]
    InCombat,

    /// The loot would not fit.
    #[error("You don't have enough inventory space.")]
    NoInventorySpace,

    /// The actor's level is below the profile's requirement.
    #[error("You need to be a level {required} thief in order to pick this pocket.")]
    LevelTooLow {
        /// Required level.
        required: u32,
        /// Actor's current level.
        level: u32,
    },
}

/// The resolved result of a firing tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Resolution {
    /// The actor succeeded.
    Succeeded(PulseSucceededDetails),
    /// The actor failed and was penalized.
    Failed(PulseFailedDetails),
}

/// What one call to [`ActionPulse::reward`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PulseStep {
    /// Not a firing tick; nothing was evaluated.
    Pending,
    /// The attempt resolved and the pulse terminated.
    Resolved(Resolution),
}

/// Errors from driving a pulse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PulseError {
    /// Requirements failed; the attempt did not start.
    #[error("attempt rejected: {rejection}")]
    Rejected {
        /// Why.
        #[from]
        rejection: Rejection,
    },

    /// Requirements were already checked for this pulse.
    #[error("pulse already started (phase {phase:?})")]
    AlreadyStarted {
        /// Phase at the time of the call.
        phase: PulsePhase,
    },

    /// `reward` was called before requirements passed or after termination.
    #[error("pulse is not running (phase {phase:?})")]
    NotRunning {
        /// Phase at the time of the call.
        phase: PulsePhase,
    },

    /// The actor or target passed in is not the one this pulse was built for.
    #[error("pulse participant mismatch")]
    ParticipantMismatch,

    /// Actor state rejected an update.
    #[error("actor state error: {source}")]
    Actor {
        /// The underlying error.
        #[from]
        source: ActorError,
    },

    /// The elapsed counter overflowed.
    #[error("arithmetic overflow in pulse: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}

// ---------------------------------------------------------------------------
// ActionPulse
// ---------------------------------------------------------------------------

/// One running instance of a timed action.
#[derive(Debug, Clone)]
pub struct ActionPulse {
    actor_id: ActorId,
    target_id: EntityId,
    profile: Arc<ActionProfile>,
    elapsed: u64,
    phase: PulsePhase,
}

impl ActionPulse {
    /// A pulse for `actor` acting on `target` under `profile`.
    pub const fn new(actor_id: ActorId, target_id: EntityId, profile: Arc<ActionProfile>) -> Self {
        Self {
            actor_id,
            target_id,
            profile,
            elapsed: 0,
            phase: PulsePhase::NotStarted,
        }
    }

    /// The acting actor.
    pub const fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    /// The target.
    pub const fn target_id(&self) -> EntityId {
        self.target_id
    }

    /// The profile this pulse runs.
    pub fn profile(&self) -> &ActionProfile {
        &self.profile
    }

    /// Calls to [`reward`](Self::reward) so far.
    pub const fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// Current lifecycle phase.
    pub const fn phase(&self) -> PulsePhase {
        self.phase
    }

    /// Check whether the attempt may start, and if so set it up.
    ///
    /// Checks, in priority order: target availability, cooldown, combat,
    /// inventory space, level. A rejection is sent to the actor as a chat
    /// message and nothing is mutated. On success the actor faces the target
    /// and is locked for a tick, and the target stops walking.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::Rejected`] if a requirement fails and
    /// [`PulseError::AlreadyStarted`] if called twice.
    pub fn check_requirements(
        &mut self,
        actor: &mut ActorState,
        target: &mut TargetState,
        env: &mut PulseEnv<'_>,
    ) -> Result<(), PulseError> {
        self.ensure_participants(actor, target)?;
        if self.phase != PulsePhase::NotStarted {
            return Err(PulseError::AlreadyStarted { phase: self.phase });
        }

        let now = env.clock.current_tick();
        if let Err(rejection) = self.evaluate_requirements(actor, target, now) {
            debug!(
                actor = %actor.id,
                target = %target.id,
                profile = self.profile.name(),
                tick = now,
                ?rejection,
                "attempt rejected"
            );
            env.messages.send(actor.id, &rejection.to_string());
            return Err(rejection.into());
        }

        env.presentation.face(
            EntityRef::Actor(actor.id),
            EntityRef::Target(target.id),
            START_FACE_TICKS,
        );
        actor.locks.lock(now, START_LOCK_TICKS);
        target.reset_walking_queue();
        target.locks.lock_movement(now, START_LOCK_TICKS);

        self.phase = PulsePhase::Ready;
        debug!(
            actor = %actor.id,
            target = %target.id,
            profile = self.profile.name(),
            tick = now,
            "attempt started"
        );
        Ok(())
    }

    /// Lifecycle hook with nothing to do for this action.
    pub const fn animate(&self) {}

    /// Advance the pulse by one tick.
    ///
    /// The first call plays the perform animation. Calls whose elapsed count
    /// is not a multiple of [`CADENCE`] return [`PulseStep::Pending`]. The
    /// first multiple evaluates the attempt, rewards or penalizes, and
    /// terminates the pulse.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::NotRunning`] before requirements pass or after
    /// termination, and [`PulseError::Actor`] if actor state overflows. An
    /// overflow is detected before anything is shown or granted, and the
    /// pulse ends as cancelled.
    pub fn reward(
        &mut self,
        actor: &mut ActorState,
        target: &TargetState,
        env: &mut PulseEnv<'_>,
    ) -> Result<PulseStep, PulseError> {
        self.ensure_participants(actor, target)?;
        match self.phase {
            PulsePhase::Ready | PulsePhase::Running => {}
            phase @ (PulsePhase::NotStarted | PulsePhase::Terminated(_)) => {
                return Err(PulseError::NotRunning { phase });
            }
        }

        if self.elapsed == 0 {
            env.presentation
                .animate(EntityRef::Actor(actor.id), PERFORM_ANIMATION);
        }
        self.elapsed = self
            .elapsed
            .checked_add(1)
            .ok_or_else(|| PulseError::ArithmeticOverflow {
                context: "elapsed tick counter".to_owned(),
            })?;
        self.phase = PulsePhase::Running;

        if self.elapsed.checked_rem(CADENCE) != Some(0) {
            return Ok(PulseStep::Pending);
        }

        let tick = env.clock.current_tick();
        let level = actor.skills.level(self.profile.skill());
        let resolution = if success::succeeds(level, self.profile.required_level(), env.rolls) {
            self.resolve_success(actor, target, env, tick)
                .map(Resolution::Succeeded)
        } else {
            self.resolve_failure(actor, target, env, tick)
                .map(Resolution::Failed)
        };
        match resolution {
            Ok(resolution) => Ok(PulseStep::Resolved(resolution)),
            Err(error) => {
                self.phase = PulsePhase::Terminated(PulseOutcome::Cancelled);
                Err(error)
            }
        }
    }

    /// Stop the pulse. Returns `true` if this call cancelled it.
    pub fn stop(&mut self) -> bool {
        if self.phase.is_terminated() {
            return false;
        }
        self.phase = PulsePhase::Terminated(PulseOutcome::Cancelled);
        debug!(actor = %self.actor_id, profile = self.profile.name(), "pulse cancelled");
        true
    }

    /// Send the message for `kind` to the actor.
    pub fn message(
        &self,
        kind: PulseMessageKind,
        target: &TargetState,
        messages: &mut dyn MessageSink,
    ) {
        match kind {
            PulseMessageKind::Start => {
                let text = render_template(&self.profile.messages().start, &target.name);
                messages.send(self.actor_id, &text);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn ensure_participants(
        &self,
        actor: &ActorState,
        target: &TargetState,
    ) -> Result<(), PulseError> {
        if actor.id == self.actor_id && target.id == self.target_id {
            Ok(())
        } else {
            Err(PulseError::ParticipantMismatch)
        }
    }

    fn evaluate_requirements(
        &self,
        actor: &ActorState,
        target: &TargetState,
        now: Tick,
    ) -> Result<(), Rejection> {
        if !target.is_available_to(actor.id) {
            return Err(Rejection::TargetUnavailable);
        }
        let skill = self.profile.skill();
        if let Some(until) = actor.cooldowns.active_until(skill, now) {
            return Err(Rejection::CoolingDown { until });
        }
        if actor.in_combat(now) {
            return Err(Rejection::InCombat);
        }
        if !self.has_inventory_space(actor) {
            return Err(Rejection::NoInventorySpace);
        }
        let level = actor.skills.level(skill);
        let required = self.profile.required_level().get();
        if level < required {
            return Err(Rejection::LevelTooLow { required, level });
        }
        Ok(())
    }

    /// A full inventory only passes when the loot is a single entry whose
    /// largest stack merges into an existing one.
    fn has_inventory_space(&self, actor: &ActorState) -> bool {
        let loot = self.profile.loot();
        if !actor.inventory.is_full() || loot.is_empty() {
            return true;
        }
        match loot {
            [only] => actor.inventory.has_space_for(&only.max_stack()),
            _ => false,
        }
    }

    fn resolve_success(
        &mut self,
        actor: &mut ActorState,
        target: &TargetState,
        env: &mut PulseEnv<'_>,
        tick: Tick,
    ) -> Result<PulseSucceededDetails, PulseError> {
        let profile = Arc::clone(&self.profile);
        let level_up = reward::grant_experience(actor, &profile)?;

        actor.locks.unlock_interaction();
        let text = render_template(&profile.messages().success, &target.name);
        env.messages.send(actor.id, &text);

        let rolled = profile.roll_loot(env.rolls);
        let loot = reward::distribute(actor, &rolled, env.ground, tick);

        for milestone in profile.milestones() {
            if milestone.matches(target, actor.location) {
                env.achievements
                    .finish_task(actor.id, milestone.region, milestone.tier, milestone.task);
            }
        }

        self.phase = PulsePhase::Terminated(PulseOutcome::Succeeded);
        info!(
            actor = %actor.id,
            target = %target.id,
            profile = profile.name(),
            tick,
            items = loot.len(),
            "attempt succeeded"
        );

        Ok(PulseSucceededDetails {
            actor_id: actor.id,
            target_id: target.id,
            profile: profile.name().to_owned(),
            tick,
            experience: profile.experience(),
            level_up,
            loot,
        })
    }

    fn resolve_failure(
        &mut self,
        actor: &mut ActorState,
        target: &TargetState,
        env: &mut PulseEnv<'_>,
        tick: Tick,
    ) -> Result<PulseFailedDetails, PulseError> {
        let profile = Arc::clone(&self.profile);
        let target_ref = EntityRef::Target(target.id);
        penalty::ensure_schedulable(tick)?;

        env.presentation.animate(target_ref, RETALIATION_ANIMATION);
        env.presentation
            .face(target_ref, EntityRef::Actor(actor.id), RETALIATION_FACE_TICKS);
        env.presentation
            .say(target_ref, &profile.messages().target_response);

        let effects = penalty::apply_failure(actor, &profile, tick, env.presentation)?;

        let text = render_template(&profile.messages().failure, &target.name);
        env.messages.send(actor.id, &text);

        self.phase = PulsePhase::Terminated(PulseOutcome::Failed);
        info!(
            actor = %actor.id,
            target = %target.id,
            profile = profile.name(),
            tick,
            damage = effects.damage_dealt,
            "attempt failed"
        );

        Ok(PulseFailedDetails {
            actor_id: actor.id,
            target_id: target.id,
            tick,
            damage_dealt: effects.damage_dealt,
            stunned_until: effects.stunned_until,
            cooldown_until: effects.cooldown_until,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use skillpulse_actors::Inventory;
    use skillpulse_types::{ItemId, ItemStack, Location, NpcTypeId, Skill};

    use super::*;
    use crate::clock::WorldClock;
    use crate::dice::ScriptedRolls;
    use crate::profile::ProfileTable;
    use crate::recording::{AchievementLog, GroundItemStore, Outbox, PresentationLog};

    struct Harness {
        clock: WorldClock,
        rolls: ScriptedRolls,
        ground: GroundItemStore,
        presentation: PresentationLog,
        outbox: Outbox,
        achievements: AchievementLog,
    }

    impl Harness {
        fn new(tick: Tick, draws: &[u32]) -> Self {
            Self {
                clock: WorldClock::starting_at(tick),
                rolls: ScriptedRolls::new(draws.iter().copied()),
                ground: GroundItemStore::new(),
                presentation: PresentationLog::new(),
                outbox: Outbox::new(),
                achievements: AchievementLog::new(),
            }
        }

        fn env(&mut self) -> PulseEnv<'_> {
            PulseEnv {
                clock: &self.clock,
                rolls: &mut self.rolls,
                ground: &mut self.ground,
                presentation: &mut self.presentation,
                messages: &mut self.outbox,
                achievements: &mut self.achievements,
            }
        }
    }

    fn profile(name: &str) -> Arc<ActionProfile> {
        ProfileTable::builtin().unwrap().require(name).unwrap()
    }

    fn thief(level: u32) -> ActorState {
        let mut actor = ActorState::new("Thief", Location::new(3210, 3462, 0));
        actor.skills.set_level(Skill::Thieving, level);
        actor
    }

    fn man() -> TargetState {
        TargetState::new(NpcTypeId(1), "Man", Location::new(3211, 3462, 0))
    }

    fn started(
        actor: &mut ActorState,
        target: &mut TargetState,
        name: &str,
        h: &mut Harness,
    ) -> ActionPulse {
        let mut pulse = ActionPulse::new(actor.id, target.id, profile(name));
        pulse.check_requirements(actor, target, &mut h.env()).unwrap();
        pulse
    }

    // -----------------------------------------------------------------------
    // Requirements
    // -----------------------------------------------------------------------

    #[test]
    fn dead_target_outranks_low_level() {
        let mut actor = thief(1);
        let mut target = man();
        target.alive = false;
        let mut h = Harness::new(10, &[]);
        let mut pulse = ActionPulse::new(actor.id, target.id, profile("guard"));

        let result = pulse.check_requirements(&mut actor, &mut target, &mut h.env());

        assert_eq!(
            result,
            Err(PulseError::Rejected {
                rejection: Rejection::TargetUnavailable
            })
        );
        assert_eq!(h.outbox.last_for(actor.id), Some("You can't reach that."));
        assert_eq!(pulse.phase(), PulsePhase::NotStarted);
    }

    #[test]
    fn rejection_priority_holds_for_every_combination() {
        // Bits: 0 target unavailable, 1 cooldown, 2 combat, 3 full bag, 4 low level.
        for mask in 0_u8..32 {
            let mut actor = thief(if mask & 16 == 0 { 40 } else { 1 });
            let mut target = man();
            if mask & 1 != 0 {
                target.hide_from(actor.id);
            }
            if mask & 2 != 0 {
                actor.cooldowns.set(Skill::Thieving, 20);
            }
            if mask & 4 != 0 {
                actor.enter_combat(10, 5);
            }
            if mask & 8 != 0 {
                actor.inventory = Inventory::new(1);
                actor.inventory.add(ItemStack::single(ItemId(526), 1)).unwrap();
            }
            let mut h = Harness::new(10, &[]);
            let mut pulse = ActionPulse::new(actor.id, target.id, profile("guard"));

            let rejection = match pulse.check_requirements(&mut actor, &mut target, &mut h.env()) {
                Err(PulseError::Rejected { rejection }) => Some(rejection),
                Ok(()) => None,
                Err(other) => panic!("unexpected error {other}"),
            };

            let expected = match mask.trailing_zeros() {
                0 => Some(Rejection::TargetUnavailable),
                1 => Some(Rejection::CoolingDown { until: 20 }),
                2 => Some(Rejection::InCombat),
                3 => Some(Rejection::NoInventorySpace),
                4 => Some(Rejection::LevelTooLow {
                    required: 40,
                    level: 1,
                }),
                _ => None,
            };
            assert_eq!(rejection, expected, "mask {mask:05b}");
        }
    }

    #[test]
    fn rejection_mutates_nothing() {
        let mut actor = thief(1);
        let mut target = man();
        target.walking = true;
        let before_actor = actor.clone();
        let before_target = target.clone();
        let mut h = Harness::new(10, &[]);
        let mut pulse = ActionPulse::new(actor.id, target.id, profile("guard"));

        assert!(pulse.check_requirements(&mut actor, &mut target, &mut h.env()).is_err());

        assert_eq!(actor, before_actor);
        assert_eq!(target, before_target);
        assert!(h.presentation.events().is_empty());
        assert_eq!(
            h.outbox.last_for(actor.id),
            Some("You need to be a level 40 thief in order to pick this pocket.")
        );
    }

    #[test]
    fn expired_cooldown_does_not_block() {
        let mut actor = thief(1);
        actor.cooldowns.set(Skill::Thieving, 10);
        let mut target = man();
        let mut h = Harness::new(10, &[]);
        let mut pulse = ActionPulse::new(actor.id, target.id, profile("man"));

        assert!(pulse.check_requirements(&mut actor, &mut target, &mut h.env()).is_ok());
    }

    #[test]
    fn full_inventory_passes_when_single_loot_stacks() {
        let mut actor = thief(1).with_inventory(Inventory::new(1));
        actor.inventory.add(ItemStack::stackable(ItemId(995), 100)).unwrap();
        let mut target = man();
        let mut h = Harness::new(10, &[]);
        let mut pulse = ActionPulse::new(actor.id, target.id, profile("man"));

        assert!(pulse.check_requirements(&mut actor, &mut target, &mut h.env()).is_ok());
    }

    #[test]
    fn full_inventory_fails_with_multiple_loot_entries() {
        let mut actor = thief(10).with_inventory(Inventory::new(1));
        actor.inventory.add(ItemStack::stackable(ItemId(995), 100)).unwrap();
        let mut target = man();
        let mut h = Harness::new(10, &[]);
        let mut pulse = ActionPulse::new(actor.id, target.id, profile("farmer"));

        assert_eq!(
            pulse.check_requirements(&mut actor, &mut target, &mut h.env()),
            Err(PulseError::Rejected {
                rejection: Rejection::NoInventorySpace
            })
        );
    }

    #[test]
    fn start_faces_locks_and_halts_target() {
        let mut actor = thief(1);
        let mut target = man();
        target.walking = true;
        let mut h = Harness::new(10, &[]);

        let pulse = started(&mut actor, &mut target, "man", &mut h);

        assert_eq!(pulse.phase(), PulsePhase::Ready);
        assert!(actor.locks.is_interaction_locked(10));
        assert!(actor.locks.is_movement_locked(10));
        assert!(!actor.locks.is_movement_locked(11));
        assert!(!target.walking);
        assert!(target.locks.is_movement_locked(10));
        assert_eq!(
            h.presentation.events(),
            &[crate::recording::PresentationEvent::Face {
                entity: EntityRef::Actor(actor.id),
                toward: EntityRef::Target(target.id),
                ticks: 2,
            }]
        );
    }

    #[test]
    fn second_check_is_rejected() {
        let mut actor = thief(1);
        let mut target = man();
        let mut h = Harness::new(10, &[]);
        let mut pulse = started(&mut actor, &mut target, "man", &mut h);

        assert!(matches!(
            pulse.check_requirements(&mut actor, &mut target, &mut h.env()),
            Err(PulseError::AlreadyStarted { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Cadence and resolution
    // -----------------------------------------------------------------------

    #[test]
    fn reward_before_start_is_not_running() {
        let mut actor = thief(1);
        let target = man();
        let mut h = Harness::new(10, &[]);
        let mut pulse = ActionPulse::new(actor.id, target.id, profile("man"));

        assert_eq!(
            pulse.reward(&mut actor, &target, &mut h.env()),
            Err(PulseError::NotRunning {
                phase: PulsePhase::NotStarted
            })
        );
    }

    #[test]
    fn resolves_on_third_call_only() {
        let mut actor = thief(50);
        let mut target = man();
        let mut h = Harness::new(10, &[5, 10]);
        let mut pulse = started(&mut actor, &mut target, "man", &mut h);

        assert_eq!(pulse.reward(&mut actor, &target, &mut h.env()), Ok(PulseStep::Pending));
        assert!(h.presentation.has_animation(EntityRef::Actor(actor.id), PERFORM_ANIMATION));
        assert_eq!(pulse.phase(), PulsePhase::Running);
        assert_eq!(pulse.reward(&mut actor, &target, &mut h.env()), Ok(PulseStep::Pending));
        assert_eq!(h.rolls.consumed(), 0);

        let step = pulse.reward(&mut actor, &target, &mut h.env()).unwrap();
        assert!(matches!(step, PulseStep::Resolved(Resolution::Succeeded(_))));
        assert_eq!(h.rolls.consumed(), 2);
        assert_eq!(pulse.phase(), PulsePhase::Terminated(PulseOutcome::Succeeded));
        assert!(matches!(
            pulse.reward(&mut actor, &target, &mut h.env()),
            Err(PulseError::NotRunning { .. })
        ));
    }

    #[test]
    fn success_rewards_and_unlocks() {
        let mut actor = thief(50);
        let mut target = man();
        let mut h = Harness::new(10, &[5, 10]);
        let mut pulse = started(&mut actor, &mut target, "man", &mut h);
        pulse.reward(&mut actor, &target, &mut h.env()).unwrap();
        pulse.reward(&mut actor, &target, &mut h.env()).unwrap();
        actor.locks.lock_interaction(10, 50);

        let PulseStep::Resolved(Resolution::Succeeded(details)) =
            pulse.reward(&mut actor, &target, &mut h.env()).unwrap()
        else {
            panic!("expected success");
        };

        assert!(!actor.locks.is_interaction_locked(10));
        assert_eq!(details.experience, rust_decimal::Decimal::new(8, 0));
        assert_eq!(details.loot.len(), 1);
        assert_eq!(actor.inventory.count(ItemId(995)), 3);
        assert_eq!(h.outbox.last_for(actor.id), Some("You pick the man's pocket."));
        assert!(!actor.is_stunned(10));
    }

    #[test]
    fn failure_penalizes_and_target_retaliates() {
        let mut actor = thief(40);
        let mut target = man();
        let mut h = Harness::new(10, &[0]);
        let mut pulse = started(&mut actor, &mut target, "guard", &mut h);
        pulse.reward(&mut actor, &target, &mut h.env()).unwrap();
        pulse.reward(&mut actor, &target, &mut h.env()).unwrap();

        let PulseStep::Resolved(Resolution::Failed(details)) =
            pulse.reward(&mut actor, &target, &mut h.env()).unwrap()
        else {
            panic!("expected failure");
        };

        assert_eq!(details.cooldown_until, 14);
        assert_eq!(details.damage_dealt, 2);
        assert!(h.presentation.has_animation(EntityRef::Target(target.id), RETALIATION_ANIMATION));
        assert!(h.presentation.events().contains(&crate::recording::PresentationEvent::Say {
            entity: EntityRef::Target(target.id),
            text: "What do you think you're doing?".to_owned(),
        }));
        assert_eq!(h.outbox.last_for(actor.id), Some("You fail to pick the man's pocket."));
        assert_eq!(actor.inventory.count(ItemId(995)), 0);
        assert_eq!(pulse.phase(), PulsePhase::Terminated(PulseOutcome::Failed));
    }

    #[test]
    fn stop_is_idempotent() {
        let mut actor = thief(1);
        let mut target = man();
        let mut h = Harness::new(10, &[]);
        let mut pulse = started(&mut actor, &mut target, "man", &mut h);

        assert!(pulse.stop());
        assert!(!pulse.stop());
        assert_eq!(pulse.phase(), PulsePhase::Terminated(PulseOutcome::Cancelled));
        assert!(matches!(
            pulse.reward(&mut actor, &target, &mut h.env()),
            Err(PulseError::NotRunning { .. })
        ));
    }

    #[test]
    fn stop_after_pending_tick_leaves_actor_untouched() {
        let mut actor = thief(40);
        let mut target = man();
        let mut h = Harness::new(10, &[0, 0, 0]);
        let mut pulse = started(&mut actor, &mut target, "guard", &mut h);
        assert_eq!(pulse.reward(&mut actor, &target, &mut h.env()), Ok(PulseStep::Pending));

        assert!(pulse.stop());
        for _ in 0..3 {
            assert!(matches!(
                pulse.reward(&mut actor, &target, &mut h.env()),
                Err(PulseError::NotRunning { .. })
            ));
        }

        assert_eq!(pulse.elapsed(), 1);
        assert_eq!(h.rolls.consumed(), 0);
        assert_eq!(actor.hitpoints.current(), 10);
        assert!(!actor.is_stunned(10));
        assert_eq!(actor.cooldowns.expiry(Skill::Thieving), None);
        assert_eq!(actor.skills.xp(Skill::Thieving), rust_decimal::Decimal::ZERO);
        assert_eq!(actor.inventory.count(ItemId(995)), 0);
        assert!(h.outbox.is_empty());
        assert!(!h.presentation.has_animation(EntityRef::Target(target.id), RETALIATION_ANIMATION));
        assert!(h.ground.items().is_empty());
    }

    #[test]
    fn unschedulable_failure_shows_nothing_and_cancels() {
        let mut actor = thief(40);
        let mut target = man();
        let mut h = Harness::new(Tick::MAX - 2, &[0]);
        let mut pulse = started(&mut actor, &mut target, "guard", &mut h);
        pulse.reward(&mut actor, &target, &mut h.env()).unwrap();
        pulse.reward(&mut actor, &target, &mut h.env()).unwrap();
        let before = actor.clone();

        let result = pulse.reward(&mut actor, &target, &mut h.env());

        assert!(matches!(
            result,
            Err(PulseError::Actor {
                source: ActorError::ArithmeticOverflow { .. }
            })
        ));
        assert_eq!(actor, before);
        assert!(h.outbox.is_empty());
        assert!(!h.presentation.has_animation(EntityRef::Target(target.id), RETALIATION_ANIMATION));
        assert!(!h.presentation.events().iter().any(|event| matches!(
            event,
            crate::recording::PresentationEvent::Say { .. }
        )));
        assert_eq!(pulse.phase(), PulsePhase::Terminated(PulseOutcome::Cancelled));
    }

    #[test]
    fn start_message_uses_lower_cased_name() {
        let actor = thief(1);
        let target = TargetState::new(NpcTypeId(2234), "Master Farmer", Location::new(0, 0, 0));
        let pulse = ActionPulse::new(actor.id, target.id, profile("master_farmer"));
        let mut outbox = Outbox::new();

        pulse.message(PulseMessageKind::Start, &target, &mut outbox);

        assert_eq!(
            outbox.for_actor(actor.id),
            vec!["You attempt to pick the master farmer's pocket."]
        );
    }

    #[test]
    fn resolution_serializes_with_result_tag() {
        let resolution = Resolution::Failed(PulseFailedDetails {
            actor_id: ActorId::new(),
            target_id: EntityId::new(),
            tick: 3,
            damage_dealt: 2,
            stunned_until: 7,
            cooldown_until: 7,
        });
        let json = serde_json::to_value(&resolution).unwrap();
        assert_eq!(json["result"], "failed");
        assert_eq!(json["cooldown_until"], 7);

        let phase = serde_json::to_value(PulsePhase::Terminated(PulseOutcome::Cancelled)).unwrap();
        assert_eq!(phase, serde_json::json!({ "phase": "terminated", "outcome": "cancelled" }));
    }

    #[test]
    fn mismatched_actor_is_refused() {
        let mut actor = thief(1);
        let mut stranger = thief(1);
        let mut target = man();
        let mut h = Harness::new(10, &[]);
        let mut pulse = ActionPulse::new(actor.id, target.id, profile("man"));

        assert_eq!(
            pulse.check_requirements(&mut stranger, &mut target, &mut h.env()),
            Err(PulseError::ParticipantMismatch)
        );
        assert!(pulse.check_requirements(&mut actor, &mut target, &mut h.env()).is_ok());
    }
}
