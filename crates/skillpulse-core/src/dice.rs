//! Random roll sources.
//!
//! Every random decision in the core goes through [`RollSource`]. Any
//! [`rand::Rng`] is a roll source, so the engine uses a seeded `SmallRng`
//! for reproducible runs; [`ScriptedRolls`] replays a fixed list of draws
//! for tests and for replaying recorded attempts.

use std::collections::VecDeque;

use rand::Rng;

/// A source of uniform random integers.
pub trait RollSource {
    /// Draw a uniform integer in `0..upper`. Returns 0 when `upper` is 0.
    fn roll_below(&mut self, upper: u32) -> u32;
}

impl<R: Rng> RollSource for R {
    fn roll_below(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        self.random_range(0..upper)
    }
}

/// Replays a fixed sequence of draws.
///
/// Each draw is reduced modulo the requested bound so a script can never
/// produce an out-of-range value. Once the script is exhausted every draw
/// returns 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptedRolls {
    draws: VecDeque<u32>,
    consumed: usize,
}

impl ScriptedRolls {
    /// A source that will return `draws` in order.
    pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            consumed: 0,
        }
    }

    /// How many draws have been taken so far, including ones past the end
    /// of the script.
    pub const fn consumed(&self) -> usize {
        self.consumed
    }

    /// Draws still queued.
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RollSource for ScriptedRolls {
    fn roll_below(&mut self, upper: u32) -> u32 {
        self.consumed = self.consumed.saturating_add(1);
        let draw = self.draws.pop_front().unwrap_or(0);
        draw.checked_rem(upper).unwrap_or(0)
    }
}
