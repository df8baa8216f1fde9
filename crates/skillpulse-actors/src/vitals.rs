//! Hitpoints and direct damage.

use serde::{Deserialize, Serialize};

/// Remaining hitpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hitpoints {
    current: u32,
}

impl Hitpoints {
    /// Full health at `maximum`.
    pub const fn full(maximum: u32) -> Self {
        Self { current: maximum }
    }

    /// Remaining hitpoints.
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Whether hitpoints have reached zero.
    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Apply a direct hit that ignores armour and blocking.
    ///
    /// Hitpoints saturate at zero; death handling belongs to the combat
    /// system. Returns the damage actually removed.
    pub fn apply_hit(&mut self, damage: u32) -> u32 {
        let dealt = damage.min(self.current);
        self.current = self.current.saturating_sub(dealt);
        dealt
    }
}
