//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during startup and the tick
//! loop so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: skillpulse_core::config::ConfigError,
    },

    /// The scenario section could not be read.
    #[error("scenario error: {message}")]
    Scenario {
        /// Description of the scenario failure.
        message: String,
    },

    /// A pulse could not be scheduled for a reason other than a rejection.
    #[error("schedule error: {source}")]
    Schedule {
        /// The underlying schedule error.
        #[from]
        source: skillpulse_core::ScheduleError,
    },

    /// A tick failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: skillpulse_core::TickError,
    },
}
