//! Timed skill-action pulses for the Skillpulse simulation.
//!
//! This crate owns the lifecycle of one multi-tick action -- requirement
//! checks, the every-third-tick evaluation, the success model, reward
//! distribution with ground fallback, and the failure penalty -- plus the
//! scheduler that drives pulses once per tick.
//!
//! # Modules
//!
//! - [`clock`] -- Monotonic world clock ([`WorldClock`]).
//! - [`config`] -- Configuration loading from `skillpulse.yaml`.
//! - [`dice`] -- [`RollSource`] trait and [`ScriptedRolls`].
//! - [`penalty`] -- Stun, hit and cooldown on failure.
//! - [`profile`] -- Immutable action profiles and the [`ProfileTable`].
//! - [`pulse`] -- The [`ActionPulse`] state machine.
//! - [`recording`] -- In-memory collaborator implementations.
//! - [`reward`] -- Experience and loot distribution.
//! - [`services`] -- Collaborator traits consumed by the pulse.
//! - [`success`] -- The success model.
//! - [`tick`] -- [`PulseScheduler`] and [`SimulationState`].

pub mod clock;
pub mod config;
pub mod dice;
pub mod penalty;
pub mod profile;
pub mod pulse;
pub mod recording;
pub mod reward;
pub mod services;
pub mod success;
pub mod tick;

pub use clock::WorldClock;
pub use config::PulseConfig;
pub use dice::{RollSource, ScriptedRolls};
pub use profile::{ActionProfile, ProfileTable};
pub use pulse::{ActionPulse, PulseEnv, PulseError, PulseOutcome, PulsePhase, PulseStep, Rejection, Resolution};
pub use tick::{PulseFault, PulseScheduler, ScheduleError, SimulationState, TickError, TickSummary};
