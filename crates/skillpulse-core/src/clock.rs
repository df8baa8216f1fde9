//! World clock for the pulse simulation.
//!
//! The clock is the single source of truth for the current tick. It only
//! moves forward, one tick per global step, and implements [`TickClock`]
//! so pulses can read it without being able to advance it.

use skillpulse_types::Tick;

use crate::services::TickClock;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Monotonic tick counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldClock {
    tick: Tick,
}

impl WorldClock {
    /// A clock at tick 0.
    pub const fn new() -> Self {
        Self { tick: 0 }
    }

    /// A clock resumed at `tick` (state restoration and tests).
    pub const fn starting_at(tick: Tick) -> Self {
        Self { tick }
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<Tick, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> Tick {
        self.tick
    }
}

impl TickClock for WorldClock {
    fn current_tick(&self) -> Tick {
        self.tick
    }
}
