//! Skill levels and experience tracking.
//!
//! Every actor has a level in each [`Skill`]. Experience is tracked as a
//! [`Decimal`] so fractional rewards (14.5 XP for a farmer, 46.8 for a
//! guard) accumulate exactly.
//!
//! # Level-Up Formula
//!
//! Experience required to advance from level N to level N+1 is `N * 100`.
//! Experience toward the next level resets (carrying the remainder) on each
//! level-up, and a single large gain can advance several levels.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use skillpulse_types::Skill;

use crate::error::ActorError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum level in any skill.
pub const MAX_SKILL_LEVEL: u32 = 99;

/// Level every skill starts at, except hitpoints.
pub const STARTING_LEVEL: u32 = 1;

/// Hitpoints starting level.
pub const STARTING_HITPOINTS_LEVEL: u32 = 10;

// ---------------------------------------------------------------------------
// SkillSet
// ---------------------------------------------------------------------------

/// Per-actor skill levels with experience accumulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSet {
    levels: BTreeMap<Skill, u32>,
    xp: BTreeMap<Skill, Decimal>,
}

impl SkillSet {
    /// A fresh skill set: every skill at [`STARTING_LEVEL`], hitpoints at
    /// [`STARTING_HITPOINTS_LEVEL`].
    pub fn new() -> Self {
        let levels = Skill::ALL
            .iter()
            .map(|&skill| {
                let level = if skill == Skill::Hitpoints {
                    STARTING_HITPOINTS_LEVEL
                } else {
                    STARTING_LEVEL
                };
                (skill, level)
            })
            .collect();
        Self {
            levels,
            xp: BTreeMap::new(),
        }
    }

    /// Current level in `skill`.
    pub fn level(&self, skill: Skill) -> u32 {
        self.levels.get(&skill).copied().unwrap_or(STARTING_LEVEL)
    }

    /// Overwrite the level in `skill`, clamped to `1..=MAX_SKILL_LEVEL`.
    ///
    /// Used for spawning actors at a given level and for temporary
    /// boosts or drains applied by other systems.
    pub fn set_level(&mut self, skill: Skill, level: u32) {
        self.levels
            .insert(skill, level.clamp(STARTING_LEVEL, MAX_SKILL_LEVEL));
    }

    /// Experience accumulated toward the next level in `skill`.
    pub fn xp(&self, skill: Skill) -> Decimal {
        self.xp.get(&skill).copied().unwrap_or(Decimal::ZERO)
    }

    /// Add experience to `skill`, levelling up as many times as the gain
    /// allows.
    ///
    /// Returns `Some(new_level)` if the skill levelled up, `None` otherwise.
    /// Non-positive amounts are ignored.
    pub fn add_xp(&mut self, skill: Skill, amount: Decimal) -> Result<Option<u32>, ActorError> {
        if amount <= Decimal::ZERO {
            return Ok(None);
        }

        let original_level = self.level(skill);
        if original_level >= MAX_SKILL_LEVEL {
            return Ok(None);
        }

        let mut level = original_level;
        let mut xp = self
            .xp(skill)
            .checked_add(amount)
            .ok_or_else(|| ActorError::ArithmeticOverflow {
                context: format!("XP overflow for skill {skill}"),
            })?;

        loop {
            if level >= MAX_SKILL_LEVEL {
                xp = Decimal::ZERO;
                break;
            }
            let threshold = Decimal::from(level)
                .checked_mul(Decimal::ONE_HUNDRED)
                .ok_or_else(|| ActorError::ArithmeticOverflow {
                    context: format!("level-up threshold overflow for skill {skill}"),
                })?;
            if xp < threshold {
                break;
            }
            xp = xp
                .checked_sub(threshold)
                .ok_or_else(|| ActorError::ArithmeticOverflow {
                    context: format!("XP subtraction overflow for skill {skill}"),
                })?;
            level = level
                .checked_add(1)
                .ok_or_else(|| ActorError::ArithmeticOverflow {
                    context: format!("level increment overflow for skill {skill}"),
                })?;
        }

        self.levels.insert(skill, level);
        self.xp.insert(skill, xp);

        if level > original_level {
            tracing::debug!(%skill, level, "skill level up");
            Ok(Some(level))
        } else {
            Ok(None)
        }
    }
}

impl Default for SkillSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_skill_set_starting_levels() {
        let skills = SkillSet::new();
        assert_eq!(skills.level(Skill::Thieving), 1);
        assert_eq!(skills.level(Skill::Hitpoints), 10);
        assert_eq!(skills.xp(Skill::Thieving), Decimal::ZERO);
    }

    #[test]
    fn set_level_clamps() {
        let mut skills = SkillSet::new();
        skills.set_level(Skill::Thieving, 0);
        assert_eq!(skills.level(Skill::Thieving), 1);
        skills.set_level(Skill::Thieving, 150);
        assert_eq!(skills.level(Skill::Thieving), MAX_SKILL_LEVEL);
        skills.set_level(Skill::Thieving, 40);
        assert_eq!(skills.level(Skill::Thieving), 40);
    }

    #[test]
    fn fractional_xp_accumulates_exactly() {
        let mut skills = SkillSet::new();
        let farmer = Decimal::new(145, 1);
        for _ in 0..4 {
            assert_eq!(skills.add_xp(Skill::Thieving, farmer).unwrap(), None);
        }
        assert_eq!(skills.xp(Skill::Thieving), Decimal::new(58, 0));
    }

    #[test]
    fn crossing_threshold_levels_up_with_remainder() {
        let mut skills = SkillSet::new();
        let result = skills.add_xp(Skill::Thieving, Decimal::new(1085, 1)).unwrap();
        assert_eq!(result, Some(2));
        assert_eq!(skills.xp(Skill::Thieving), Decimal::new(85, 1));
    }

    #[test]
    fn large_gain_levels_up_multiple_times() {
        let mut skills = SkillSet::new();
        // 100 (1->2) + 200 (2->3) + 300 (3->4) = 600
        let result = skills.add_xp(Skill::Thieving, Decimal::new(650, 0)).unwrap();
        assert_eq!(result, Some(4));
        assert_eq!(skills.xp(Skill::Thieving), Decimal::new(50, 0));
    }

    #[test]
    fn max_level_ignores_xp() {
        let mut skills = SkillSet::new();
        skills.set_level(Skill::Thieving, MAX_SKILL_LEVEL);
        assert_eq!(skills.add_xp(Skill::Thieving, Decimal::new(1000, 0)).unwrap(), None);
        assert_eq!(skills.xp(Skill::Thieving), Decimal::ZERO);
    }

    #[test]
    fn non_positive_xp_is_ignored() {
        let mut skills = SkillSet::new();
        assert_eq!(skills.add_xp(Skill::Thieving, Decimal::ZERO).unwrap(), None);
        assert_eq!(skills.add_xp(Skill::Thieving, Decimal::NEGATIVE_ONE).unwrap(), None);
        assert_eq!(skills.xp(Skill::Thieving), Decimal::ZERO);
    }

    #[test]
    fn threshold_scales_with_level() {
        let mut skills = SkillSet::new();
        skills.set_level(Skill::Thieving, 40);
        assert_eq!(skills.add_xp(Skill::Thieving, Decimal::new(3999, 0)).unwrap(), None);
        assert_eq!(skills.add_xp(Skill::Thieving, Decimal::ONE).unwrap(), Some(41));
    }
}
