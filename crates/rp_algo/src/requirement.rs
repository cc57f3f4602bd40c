//! Exact solver for the minimum number of positive ratings that lifts the
//! approval ratio strictly above a target percentage.
//!
//! Contract:
//! - Find the least `x >= 0` with `100 * (positive + x) > target * (total + x)`.
//! - `A = 100 - target`, `B = target * total - 100 * positive`.
//! - `target >= 100`: `0` iff nothing negative exists yet, else `Unreachable`.
//! - `B < 0`: already above target, `0`.
//! - otherwise `floor(B / A) + 1` (from `A * x > B`, `A > 0`).
//!
//! All arithmetic is `i128`; no floats.

use rp_core::Tally;

/// Outcome of a requirement computation. `Unreachable` is a distinct tag so
/// callers cannot do arithmetic on an "impossible" value by accident.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requirement {
    Needed(u64),
    Unreachable,
}

impl Requirement {
    pub fn needed(self) -> Option<u64> {
        match self {
            Requirement::Needed(n) => Some(n),
            Requirement::Unreachable => None,
        }
    }

    pub fn is_unreachable(self) -> bool {
        matches!(self, Requirement::Unreachable)
    }
}

/// Minimum additional positive ratings needed to strictly exceed `target`%.
/// Assumes a validated tally (guaranteed by `Tally`'s constructor).
pub fn min_positive_needed(tally: &Tally, target: u8) -> Requirement {
    let total = i128::from(tally.total());
    let positive = i128::from(tally.positive());
    let t = i128::from(target);

    if t >= 100 {
        // Every added rating also grows the denominator: 100% stays out of
        // reach while any non-positive rating exists.
        return if positive == total { Requirement::Needed(0) } else { Requirement::Unreachable };
    }

    let a = 100 - t;
    let b = t * total - 100 * positive;
    if b < 0 {
        return Requirement::Needed(0);
    }

    let x = b / a + 1;
    Requirement::Needed(u64::try_from(x).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(total: u64, positive: u64, target: u8) -> Requirement {
        min_positive_needed(&Tally::new(total, positive).unwrap(), target)
    }

    #[test]
    fn eighty_of_hundred_to_ninety() {
        // A = 10, B = 9000 - 8000 = 1000 → 1000/10 + 1
        assert_eq!(solve(100, 80, 90), Requirement::Needed(101));
        assert!(100 * (80 + 101) > 90 * (100 + 101));
        assert!(100 * (80 + 100) <= 90 * (100 + 100));
    }

    #[test]
    fn exactly_on_target_still_needs_one_more() {
        // 90/100 == 90%, strict exceedance requires one more positive.
        assert_eq!(solve(100, 90, 90), Requirement::Needed(1));
    }

    #[test]
    fn already_above_target_needs_nothing() {
        assert_eq!(solve(100, 95, 90), Requirement::Needed(0));
        assert_eq!(solve(10, 10, 99), Requirement::Needed(0));
    }

    #[test]
    fn empty_tally_proceeds_normally() {
        // 100x > 90x holds for x = 1.
        assert_eq!(solve(0, 0, 90), Requirement::Needed(1));
    }

    #[test]
    fn full_target_is_reachable_only_when_perfect() {
        assert_eq!(solve(50, 50, 100), Requirement::Needed(0));
        assert_eq!(solve(0, 0, 100), Requirement::Needed(0));
        assert_eq!(solve(50, 45, 100), Requirement::Unreachable);
        assert_eq!(solve(50, 49, 100).needed(), None);
    }

    #[test]
    fn large_totals_do_not_overflow() {
        let r = solve(1_000_000_000, 0, 99);
        // B = 99e9, A = 1 → 99e9 + 1
        assert_eq!(r, Requirement::Needed(99_000_000_001));
    }
}
