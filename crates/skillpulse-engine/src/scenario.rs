//! Scenario spawner: thieves and the marks they work.
//!
//! The `scenario` section of `skillpulse.yaml` lists the marks (target NPCs
//! and the profile used against each) and how many thieves to spawn. Each
//! thief gets a random thieving level in the configured range and is
//! assigned a mark round-robin.

use std::path::Path;

use rand::Rng;
use serde::Deserialize;
use skillpulse_actors::{ActorState, Inventory, TargetState};
use skillpulse_core::SimulationState;
use skillpulse_types::{ActorId, EntityId, Location, NpcTypeId, Skill};
use tracing::info;

use crate::error::EngineError;

// -----------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------

/// The `scenario` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScenarioConfig {
    /// Number of thieves to spawn.
    #[serde(default = "default_thieves")]
    pub thieves: u32,

    /// Lowest starting thieving level.
    #[serde(default = "default_min_level")]
    pub min_level: u32,

    /// Highest starting thieving level.
    #[serde(default = "default_max_level")]
    pub max_level: u32,

    /// Inventory slots per thief.
    #[serde(default = "default_inventory_slots")]
    pub inventory_slots: usize,

    /// Targets to spawn, one each.
    #[serde(default = "default_marks")]
    pub marks: Vec<MarkConfig>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            thieves: default_thieves(),
            min_level: default_min_level(),
            max_level: default_max_level(),
            inventory_slots: default_inventory_slots(),
            marks: default_marks(),
        }
    }
}

/// One target NPC and the profile thieves use on it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarkConfig {
    /// Profile name in the profile table.
    pub profile: String,
    /// NPC definition ID.
    pub npc_type: u32,
    /// Display name.
    pub name: String,
    /// Where the NPC stands. Thieves assigned to it spawn on the same tile.
    pub location: Location,
}

const fn default_thieves() -> u32 {
    6
}

const fn default_min_level() -> u32 {
    1
}

const fn default_max_level() -> u32 {
    60
}

const fn default_inventory_slots() -> usize {
    skillpulse_actors::DEFAULT_INVENTORY_SLOTS
}

fn default_marks() -> Vec<MarkConfig> {
    let lumbridge = Location::new(3222, 3218, 0);
    vec![
        MarkConfig {
            profile: String::from("man"),
            npc_type: 1,
            name: String::from("Man"),
            location: lumbridge,
        },
        MarkConfig {
            profile: String::from("farmer"),
            npc_type: 7,
            name: String::from("Farmer"),
            location: Location::new(3190, 3275, 0),
        },
        MarkConfig {
            profile: String::from("guard"),
            npc_type: 5920,
            name: String::from("Guard"),
            location: Location::new(3210, 3462, 0),
        },
    ]
}

/// Load the `scenario` section from the config file at `path`.
///
/// A missing file or a file without a `scenario` key yields defaults.
pub fn load_scenario_config(path: &Path) -> Result<ScenarioConfig, EngineError> {
    if !path.exists() {
        return Ok(ScenarioConfig::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| EngineError::Scenario {
        message: format!("failed to read config file: {e}"),
    })?;
    parse_scenario_config(&contents)
}

/// Extract the `scenario` section from a full config document.
pub fn parse_scenario_config(yaml: &str) -> Result<ScenarioConfig, EngineError> {
    let raw: serde_yml::Value = serde_yml::from_str(yaml).map_err(|e| EngineError::Scenario {
        message: format!("failed to parse config YAML: {e}"),
    })?;
    match raw.get("scenario") {
        Some(section) => {
            serde_yml::from_value(section.clone()).map_err(|e| EngineError::Scenario {
                message: format!("failed to parse scenario config: {e}"),
            })
        }
        None => Ok(ScenarioConfig::default()),
    }
}

// -----------------------------------------------------------------------
// Spawning
// -----------------------------------------------------------------------

/// A thief and the mark it keeps working.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// The thief.
    pub actor: ActorId,
    /// Its mark.
    pub target: EntityId,
    /// Profile used against the mark.
    pub profile: String,
}

/// Spawn every mark and thief into `state`.
///
/// Levels are drawn from the state's own random source, so a seeded run
/// spawns the same thieves every time.
pub fn spawn<R: Rng>(
    config: &ScenarioConfig,
    state: &mut SimulationState<R>,
) -> Result<Vec<Assignment>, EngineError> {
    if config.marks.is_empty() {
        return Err(EngineError::Scenario {
            message: String::from("scenario has no marks"),
        });
    }
    if config.min_level > config.max_level {
        return Err(EngineError::Scenario {
            message: format!(
                "min_level {} above max_level {}",
                config.min_level, config.max_level
            ),
        });
    }

    let marks: Vec<(EntityId, &MarkConfig)> = config
        .marks
        .iter()
        .map(|mark| {
            let target = TargetState::new(NpcTypeId(mark.npc_type), mark.name.clone(), mark.location);
            (state.spawn_target(target), mark)
        })
        .collect();

    let mut assignments = Vec::new();
    for (&(target, mark), index) in marks.iter().cycle().zip(0..config.thieves) {
        let level = state.rolls.random_range(config.min_level..=config.max_level);
        let mut thief = ActorState::new(format!("Thief {index}"), mark.location)
            .with_inventory(Inventory::new(config.inventory_slots));
        thief.skills.set_level(Skill::Thieving, level);
        let actor = state.spawn_actor(thief);
        info!(actor = %actor, level, mark = mark.name, profile = mark.profile, "thief spawned");
        assignments.push(Assignment {
            actor,
            target,
            profile: mark.profile.clone(),
        });
    }
    Ok(assignments)
}
