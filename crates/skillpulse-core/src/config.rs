//! Configuration loading and typed config structures for Skillpulse.
//!
//! The configuration lives in `skillpulse.yaml`. Every section is optional;
//! missing sections and fields fall back to defaults. Action profiles written
//! in the file are layered over the built-in pickpocket table, so a file only
//! needs to list the profiles it changes or adds.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::profile::{self, ProfileDefinition, ProfileError, ProfileTable};

/// Environment variable overriding `world.seed`.
pub const SEED_ENV_VAR: &str = "SKILLPULSE_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A profile failed validation.
    #[error("invalid action profile: {source}")]
    Profile {
        /// The underlying validation error.
        #[from]
        source: ProfileError,
    },

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {var}: {source}")]
    InvalidOverride {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
        /// The underlying parse error.
        source: std::num::ParseIntError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PulseConfig {
    /// World-level settings (name, seed, timing).
    #[serde(default)]
    pub world: WorldConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Action profiles layered over the built-in table.
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileDefinition>,
}

impl PulseConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `SKILLPULSE_SEED` overrides `world.seed` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidOverride`] if the seed override is not a number.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::InvalidOverride`] if the seed override is not a number.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        let seed = std::env::var(SEED_ENV_VAR).ok();
        config.world.apply_seed_override(seed.as_deref())?;
        Ok(config)
    }

    /// Validate the configured profiles, layered over the built-in table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Profile`] if any profile is invalid.
    pub fn profile_table(&self) -> Result<ProfileTable, ConfigError> {
        let mut definitions = profile::builtin_definitions();
        for (name, definition) in &self.profiles {
            definitions.insert(name.clone(), definition.clone());
        }
        Ok(ProfileTable::from_definitions(definitions)?)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Ticks to run before the engine stops.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

impl WorldConfig {
    /// Replace the seed with `value` when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] if `value` is not a `u64`.
    pub fn apply_seed_override(&mut self, value: Option<&str>) -> Result<(), ConfigError> {
        let Some(raw) = value else {
            return Ok(());
        };
        self.seed = raw
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidOverride {
                var: SEED_ENV_VAR,
                value: raw.to_owned(),
                source,
            })?;
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: default_max_ticks(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_world_name() -> String {
    "Skillpulse".to_owned()
}

const fn default_seed() -> u64 {
    2009
}

const fn default_tick_interval_ms() -> u64 {
    600
}

const fn default_max_ticks() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_owned()
}
