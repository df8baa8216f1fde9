//! Success model for timed skill actions.
//!
//! Resolution takes at most two draws:
//!
//! 1. A critical-failure draw in `0..12`. Values below 2 fail outright,
//!    capping the best possible success rate at 10 in 12.
//! 2. A success draw in `0..=99`, compared against the chance score.
//!
//! The chance score is
//!
//! ```text
//! chance = ceil((level * 50 - required * 15) / required / 3 * 4)
//! ```
//!
//! evaluated exactly as the rational `4 * (50L - 15R) / 3R` rounded up.
//! It is deliberately not clamped: a large level gap yields scores far above
//! 100 (always passes the second draw) and a deficit yields negative scores
//! (always fails it).

use std::num::NonZeroU32;

use crate::dice::RollSource;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Size of the critical-failure draw.
pub const CRITICAL_FAILURE_RANGE: u32 = 12;

/// Critical-failure draws below this value fail regardless of skill.
pub const CRITICAL_FAILURE_BELOW: u32 = 2;

/// Size of the success draw (`0..=99`).
pub const SUCCESS_ROLL_RANGE: u32 = 100;

const LEVEL_WEIGHT: i64 = 50;
const REQUIREMENT_WEIGHT: i64 = 15;
const SCALE_NUMERATOR: i64 = 4;
const SCALE_DENOMINATOR: i64 = 3;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the unclamped chance score for an actor at `level` attempting an
/// action that requires `required`.
///
/// Returns `None` only if the intermediate products overflow `i64`, which
/// cannot happen for `u32` inputs.
pub fn success_chance(level: u32, required: NonZeroU32) -> Option<i64> {
    let level = i64::from(level);
    let required = i64::from(required.get());

    let margin = level
        .checked_mul(LEVEL_WEIGHT)?
        .checked_sub(required.checked_mul(REQUIREMENT_WEIGHT)?)?;
    let numerator = margin.checked_mul(SCALE_NUMERATOR)?;
    let denominator = required.checked_mul(SCALE_DENOMINATOR)?;

    ceil_div(numerator, denominator)
}

/// Decide whether an attempt succeeds.
///
/// Draws once for the critical-failure floor and, only if that passes,
/// once more for the success roll. Never loops.
pub fn succeeds(level: u32, required: NonZeroU32, rolls: &mut dyn RollSource) -> bool {
    let floor = rolls.roll_below(CRITICAL_FAILURE_RANGE);
    if floor < CRITICAL_FAILURE_BELOW {
        tracing::trace!(floor, "critical failure draw");
        return false;
    }

    let roll = rolls.roll_below(SUCCESS_ROLL_RANGE);
    let Some(chance) = success_chance(level, required) else {
        return false;
    };
    tracing::trace!(level, required = required.get(), chance, roll, "success roll");
    chance >= i64::from(roll)
}

/// Ceiling division for a positive denominator.
fn ceil_div(numerator: i64, denominator: i64) -> Option<i64> {
    let floor = numerator.checked_div_euclid(denominator)?;
    if numerator.checked_rem_euclid(denominator)? == 0 {
        Some(floor)
    } else {
        floor.checked_add(1)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::dice::ScriptedRolls;

    fn req(level: u32) -> NonZeroU32 {
        NonZeroU32::new(level).unwrap()
    }

    // -----------------------------------------------------------------------
    // Chance score
    // -----------------------------------------------------------------------

    #[test]
    fn chance_for_equal_levels() {
        // 4 * 35 / 3 = 46.67 -> 47
        assert_eq!(success_chance(1, req(1)), Some(47));
        assert_eq!(success_chance(40, req(40)), Some(47));
    }

    #[test]
    fn chance_for_large_level_gap_exceeds_one_hundred() {
        // 4 * (2500 - 15) / 3 = 3313.33 -> 3314
        assert_eq!(success_chance(50, req(1)), Some(3314));
    }

    #[test]
    fn chance_for_level_deficit_is_negative() {
        // 4 * (50 - 750) / 150 = -18.67 -> -18
        assert_eq!(success_chance(1, req(50)), Some(-18));
    }

    #[test]
    fn chance_exact_quotient_is_not_rounded_up() {
        // 4 * (150 - 15) / 3 = 180 exactly
        assert_eq!(success_chance(3, req(1)), Some(180));
    }

    #[test]
    fn chance_matches_float_formula() {
        for level in 1..=99_u32 {
            for required in [1_u32, 5, 10, 25, 38, 40, 55, 70, 80, 99] {
                let l = f64::from(level);
                let r = f64::from(required);
                let expected = ((l * 50.0 - r * 15.0) / r / 3.0 * 4.0).ceil();
                let actual = success_chance(level, req(required)).unwrap();
                #[allow(clippy::cast_precision_loss)]
                let actual = actual as f64;
                assert!((expected - actual).abs() < 0.5, "L={level} R={required}");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Draw discipline
    // -----------------------------------------------------------------------

    #[test]
    fn critical_failure_floor_fails_regardless_of_chance() {
        for floor in [0, 1] {
            let mut rolls = ScriptedRolls::new([floor, 0]);
            assert!(!succeeds(99, req(1), &mut rolls));
            assert_eq!(rolls.consumed(), 1);
        }
    }

    #[test]
    fn passing_floor_takes_exactly_two_draws() {
        let mut rolls = ScriptedRolls::new([2, 99, 99]);
        let _ = succeeds(1, req(1), &mut rolls);
        assert_eq!(rolls.consumed(), 2);
        assert_eq!(rolls.remaining(), 1);
    }

    #[test]
    fn success_roll_compares_inclusive() {
        // chance 47 at equal levels
        assert!(succeeds(1, req(1), &mut ScriptedRolls::new([5, 47])));
        assert!(!succeeds(1, req(1), &mut ScriptedRolls::new([5, 48])));
    }

    #[test]
    fn high_skill_scenario_succeeds() {
        let mut rolls = ScriptedRolls::new([5, 10]);
        assert!(succeeds(50, req(1), &mut rolls));
    }

    #[test]
    fn low_skill_scenario_fails() {
        let mut rolls = ScriptedRolls::new([5, 50]);
        assert!(!succeeds(1, req(50), &mut rolls));
        let mut best_case = ScriptedRolls::new([11, 0]);
        assert!(!succeeds(1, req(50), &mut best_case));
    }

    #[test]
    fn success_rate_is_capped_by_floor() {
        let mut rng = SmallRng::seed_from_u64(42);
        let trials = 12_000;
        let wins = (0..trials)
            .filter(|_| succeeds(99, req(1), &mut rng))
            .count();
        // Expected 10/12 = 10_000. Allow generous sampling noise.
        assert!(wins > 9_600 && wins < 10_400, "wins = {wins}");
    }
}
