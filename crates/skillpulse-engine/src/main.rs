//! Engine binary for the Skillpulse simulation.
//!
//! Loads configuration, spawns a scenario of thieves and marks, and drives
//! the pulse scheduler on a fixed real-time cadence until the configured
//! tick limit or Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `skillpulse.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Validate action profiles
//! 4. Seed the random source and spawn the scenario
//! 5. Run the tick loop
//! 6. Log the run summary

mod error;
mod scenario;

use std::path::Path;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_decimal::Decimal;
use skillpulse_core::config::PulseConfig;
use skillpulse_core::pulse::PulseError;
use skillpulse_core::{PulseScheduler, Resolution, ScheduleError, SimulationState, TickSummary};
use skillpulse_types::ItemPlacement;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::scenario::Assignment;

/// Config file looked up relative to the working directory.
const CONFIG_PATH: &str = "skillpulse.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, spawning, or a tick fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = Path::new(CONFIG_PATH);
    let config = load_config(config_path)?;

    // 2. Initialize structured logging. RUST_LOG wins over the config.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        max_ticks = config.world.max_ticks,
        "Configuration loaded"
    );

    // 3. Validate profiles.
    let profiles = config.profile_table()?;
    info!(profiles = profiles.len(), "Action profiles loaded");
    let mut scheduler = PulseScheduler::new(profiles);

    // 4. Spawn the scenario.
    let scenario_config = scenario::load_scenario_config(config_path)?;
    let mut state = SimulationState::new(SmallRng::seed_from_u64(config.world.seed));
    let assignments = scenario::spawn(&scenario_config, &mut state)?;
    info!(
        thieves = assignments.len(),
        marks = state.targets.len(),
        "Scenario spawned, entering tick loop"
    );

    // 5. Run the tick loop.
    let stats = run(&config, &mut scheduler, &mut state, &assignments).await?;

    // 6. Log results.
    info!(
        ticks = state.clock.tick(),
        attempts = stats.attempts,
        rejections = stats.rejections,
        successes = stats.successes,
        failures = stats.failures,
        cancelled = stats.cancelled,
        faults = stats.faults,
        items_in_inventory = stats.items_in_inventory,
        items_on_ground = stats.items_on_ground,
        experience = %stats.experience,
        "skillpulse-engine shutdown complete"
    );

    Ok(())
}

/// Load the main configuration, falling back to defaults when the file is
/// missing.
fn load_config(path: &Path) -> Result<PulseConfig, EngineError> {
    if path.exists() {
        Ok(PulseConfig::from_file(path)?)
    } else {
        let mut config = PulseConfig::default();
        let seed = std::env::var(skillpulse_core::config::SEED_ENV_VAR).ok();
        config.world.apply_seed_override(seed.as_deref())?;
        Ok(config)
    }
}

// -----------------------------------------------------------------------
// Tick loop
// -----------------------------------------------------------------------

/// Totals accumulated over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RunStats {
    attempts: u64,
    rejections: u64,
    successes: u64,
    failures: u64,
    cancelled: u64,
    faults: u64,
    items_in_inventory: u64,
    items_on_ground: u64,
    experience: Decimal,
}

impl RunStats {
    fn record(&mut self, summary: &TickSummary) {
        for resolution in &summary.resolutions {
            match resolution {
                Resolution::Succeeded(details) => {
                    self.successes = self.successes.saturating_add(1);
                    self.experience = self.experience.saturating_add(details.experience);
                    for placement in &details.loot {
                        let amount = u64::from(placement.item.amount);
                        match placement.placement {
                            ItemPlacement::Inventory => {
                                self.items_in_inventory = self.items_in_inventory.saturating_add(amount);
                            }
                            ItemPlacement::Ground { .. } => {
                                self.items_on_ground = self.items_on_ground.saturating_add(amount);
                            }
                        }
                    }
                }
                Resolution::Failed(_) => {
                    self.failures = self.failures.saturating_add(1);
                }
            }
        }
        let cancelled = u64::try_from(summary.cancelled.len()).unwrap_or(u64::MAX);
        self.cancelled = self.cancelled.saturating_add(cancelled);
        let faults = u64::try_from(summary.faults.len()).unwrap_or(u64::MAX);
        self.faults = self.faults.saturating_add(faults);
    }
}

/// Hand off this tick's chat and presentation output so neither sink
/// outlives the tick that filled it.
fn flush_sinks(state: &mut SimulationState<SmallRng>) {
    for (actor, text) in state.outbox.drain() {
        debug!(%actor, text, "chat message");
    }
    for event in state.presentation.drain() {
        debug!(?event, "presentation effect");
    }
}

/// Drive the scheduler until `max_ticks` or Ctrl-C.
///
/// Before each tick every idle thief tries its mark again. Rejections (a
/// cooldown after a failure, a full bag) are expected and only counted.
async fn run(
    config: &PulseConfig,
    scheduler: &mut PulseScheduler,
    state: &mut SimulationState<SmallRng>,
    assignments: &[Assignment],
) -> Result<RunStats, EngineError> {
    let mut stats = RunStats::default();
    let mut interval = tokio::time::interval(Duration::from_millis(config.world.tick_interval_ms));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    while state.clock.tick() < config.world.max_ticks {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut shutdown => {
                warn!(tick = state.clock.tick(), "Ctrl-C received, stopping early");
                break;
            }
        }

        for assignment in assignments {
            if scheduler.pulse_for(assignment.actor).is_some() {
                continue;
            }
            match scheduler.begin(state, assignment.actor, assignment.target, &assignment.profile) {
                Ok(()) => stats.attempts = stats.attempts.saturating_add(1),
                Err(ScheduleError::Pulse {
                    source: PulseError::Rejected { rejection },
                }) => {
                    debug!(actor = %assignment.actor, %rejection, "attempt not started");
                    stats.rejections = stats.rejections.saturating_add(1);
                }
                Err(error) => return Err(error.into()),
            }
        }

        let summary = scheduler.run_tick(state)?;
        stats.record(&summary);
        flush_sinks(state);
    }

    Ok(stats)
}
