//! Tick cycle: advances the clock and drives every active pulse once.
//!
//! Each tick:
//!
//! 1. **Advance** -- move the world clock forward and drop expired status
//!    effects.
//! 2. **Pulse** -- call [`ActionPulse::reward`] on every active pulse, in
//!    actor order. Pulses whose actor or target has left the world are
//!    cancelled. A pulse that errors is recorded as a fault and the
//!    remaining pulses still run.
//! 3. **Retire** -- remove every pulse that terminated or faulted this tick.
//!
//! The scheduler holds at most one pulse per actor. Starting a second one
//! while the first is active is refused.

use std::collections::BTreeMap;

use skillpulse_actors::{ActorState, TargetState};
use skillpulse_types::{ActorId, EntityId, PulseMessageKind, Tick};
use tracing::{debug, warn};

use crate::clock::{ClockError, WorldClock};
use crate::dice::RollSource;
use crate::profile::{ProfileError, ProfileTable};
use crate::pulse::{ActionPulse, PulseEnv, PulseError, PulseStep, Resolution};
use crate::recording::{AchievementLog, GroundItemStore, Outbox, PresentationLog};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when starting a pulse.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The actor already has an active pulse.
    #[error("actor {actor} already has an active pulse")]
    ActorBusy {
        /// The busy actor.
        actor: ActorId,
    },

    /// No such actor in the world.
    #[error("unknown actor {actor}")]
    UnknownActor {
        /// The missing actor.
        actor: ActorId,
    },

    /// No such target in the world.
    #[error("unknown target {target}")]
    UnknownTarget {
        /// The missing target.
        target: EntityId,
    },

    /// The profile lookup failed.
    #[error("profile error: {source}")]
    Profile {
        /// The underlying profile error.
        #[from]
        source: ProfileError,
    },

    /// The pulse refused to start.
    #[error("pulse error: {source}")]
    Pulse {
        /// The underlying pulse error.
        #[from]
        source: PulseError,
    },
}

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

// ---------------------------------------------------------------------------
// World state
// ---------------------------------------------------------------------------

/// The world the scheduler drives: entities plus in-memory collaborators.
#[derive(Debug)]
pub struct SimulationState<R> {
    /// Global tick counter.
    pub clock: WorldClock,
    /// Every actor, keyed by ID.
    pub actors: BTreeMap<ActorId, ActorState>,
    /// Every target, keyed by ID.
    pub targets: BTreeMap<EntityId, TargetState>,
    /// Items lying on the ground.
    pub ground: GroundItemStore,
    /// Recorded presentation effects.
    pub presentation: PresentationLog,
    /// Chat messages sent to actors.
    pub outbox: Outbox,
    /// Completed diary tasks.
    pub achievements: AchievementLog,
    /// Random source.
    pub rolls: R,
}

impl<R: RollSource> SimulationState<R> {
    /// An empty world at tick 0.
    pub const fn new(rolls: R) -> Self {
        Self {
            clock: WorldClock::new(),
            actors: BTreeMap::new(),
            targets: BTreeMap::new(),
            ground: GroundItemStore::new(),
            presentation: PresentationLog::new(),
            outbox: Outbox::new(),
            achievements: AchievementLog::new(),
            rolls,
        }
    }

    /// Add `actor` to the world.
    pub fn spawn_actor(&mut self, actor: ActorState) -> ActorId {
        let id = actor.id;
        self.actors.insert(id, actor);
        id
    }

    /// Add `target` to the world.
    pub fn spawn_target(&mut self, target: TargetState) -> EntityId {
        let id = target.id;
        self.targets.insert(id, target);
        id
    }

    /// Borrow the actor and target maps alongside a [`PulseEnv`] over the
    /// remaining fields.
    fn split(
        &mut self,
    ) -> (
        &mut BTreeMap<ActorId, ActorState>,
        &mut BTreeMap<EntityId, TargetState>,
        PulseEnv<'_>,
    ) {
        let Self {
            clock,
            actors,
            targets,
            ground,
            presentation,
            outbox,
            achievements,
            rolls,
        } = self;
        let env = PulseEnv {
            clock,
            rolls,
            ground,
            presentation,
            messages: outbox,
            achievements,
        };
        (actors, targets, env)
    }
}

// ---------------------------------------------------------------------------
// Tick summary
// ---------------------------------------------------------------------------

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick that ran.
    pub tick: Tick,
    /// Pulses still waiting for their firing tick.
    pub pending: usize,
    /// Pulses that resolved this tick.
    pub resolutions: Vec<Resolution>,
    /// Actors whose pulse was cancelled because a participant left.
    pub cancelled: Vec<ActorId>,
    /// Pulses that errored this tick and were removed.
    pub faults: Vec<PulseFault>,
}

/// A pulse that errored while being driven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulseFault {
    /// The actor whose pulse failed.
    pub actor_id: ActorId,
    /// What went wrong.
    pub error: PulseError,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Holds one pulse slot per actor and drives the slots each tick.
#[derive(Debug, Clone)]
pub struct PulseScheduler {
    profiles: ProfileTable,
    pulses: BTreeMap<ActorId, ActionPulse>,
}

impl PulseScheduler {
    /// A scheduler resolving profile names against `profiles`.
    pub const fn new(profiles: ProfileTable) -> Self {
        Self {
            profiles,
            pulses: BTreeMap::new(),
        }
    }

    /// The profile table in use.
    pub const fn profiles(&self) -> &ProfileTable {
        &self.profiles
    }

    /// Number of active pulses.
    pub fn active(&self) -> usize {
        self.pulses.len()
    }

    /// The active pulse for `actor`, if any.
    pub fn pulse_for(&self, actor: ActorId) -> Option<&ActionPulse> {
        self.pulses.get(&actor)
    }

    /// Start `profile` for `actor_id` against `target_id`.
    ///
    /// Requirements are checked immediately against the current tick. On
    /// success the start message is sent and the pulse takes the actor's
    /// slot.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::ActorBusy`] if the actor's slot is taken,
    /// a lookup error for unknown IDs or profiles, or
    /// [`ScheduleError::Pulse`] wrapping the rejection if requirements fail.
    pub fn begin<R: RollSource>(
        &mut self,
        state: &mut SimulationState<R>,
        actor_id: ActorId,
        target_id: EntityId,
        profile: &str,
    ) -> Result<(), ScheduleError> {
        if self.pulses.contains_key(&actor_id) {
            return Err(ScheduleError::ActorBusy { actor: actor_id });
        }
        let profile = self.profiles.require(profile)?;

        let (actors, targets, mut env) = state.split();
        let actor = actors
            .get_mut(&actor_id)
            .ok_or(ScheduleError::UnknownActor { actor: actor_id })?;
        let target = targets
            .get_mut(&target_id)
            .ok_or(ScheduleError::UnknownTarget { target: target_id })?;

        let mut pulse = ActionPulse::new(actor_id, target_id, profile);
        pulse.check_requirements(actor, target, &mut env)?;
        pulse.message(PulseMessageKind::Start, target, env.messages);

        self.pulses.insert(actor_id, pulse);
        Ok(())
    }

    /// Stop and remove the pulse for `actor`. Returns `true` if one was
    /// active.
    pub fn cancel(&mut self, actor: ActorId) -> bool {
        self.pulses
            .remove(&actor)
            .is_some_and(|mut pulse| pulse.stop())
    }

    /// Run one tick.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Clock`] if the clock overflows. A pulse that
    /// errors does not stop the tick: it is removed from its slot and
    /// reported in [`TickSummary::faults`].
    pub fn run_tick<R: RollSource>(
        &mut self,
        state: &mut SimulationState<R>,
    ) -> Result<TickSummary, TickError> {
        // Phase 1: Advance
        let tick = state.clock.advance()?;
        for actor in state.actors.values_mut() {
            actor.status.prune(tick);
        }

        // Phase 2: Pulse
        let mut summary = TickSummary {
            tick,
            ..TickSummary::default()
        };
        let mut finished = Vec::new();
        {
            let (actors, targets, mut env) = state.split();
            for (&actor_id, pulse) in &mut self.pulses {
                let (Some(actor), Some(target)) =
                    (actors.get_mut(&actor_id), targets.get(&pulse.target_id()))
                else {
                    warn!(actor = %actor_id, tick, "pulse participant left the world, cancelling");
                    pulse.stop();
                    summary.cancelled.push(actor_id);
                    finished.push(actor_id);
                    continue;
                };

                match pulse.reward(actor, target, &mut env) {
                    Ok(PulseStep::Pending) => {
                        summary.pending = summary.pending.saturating_add(1);
                    }
                    Ok(PulseStep::Resolved(resolution)) => {
                        summary.resolutions.push(resolution);
                        finished.push(actor_id);
                    }
                    Err(error) => {
                        warn!(actor = %actor_id, tick, %error, "pulse failed, removing");
                        finished.push(actor_id);
                        summary.faults.push(PulseFault { actor_id, error });
                    }
                }
            }
        }

        // Phase 3: Retire
        for actor_id in &finished {
            self.pulses.remove(actor_id);
        }

        debug!(
            tick,
            pending = summary.pending,
            resolved = summary.resolutions.len(),
            cancelled = summary.cancelled.len(),
            faults = summary.faults.len(),
            "tick complete"
        );
        Ok(summary)
    }
}
