//! Milestone pick: the next target percentage above the current one.

use core::cmp::Ordering;

use rp_core::{rounding::Ratio, variables::Milestones, Tally};

/// Ceiling used when every milestone is already at or below the current percent.
pub const FULL: u8 = 100;

/// Smallest milestone strictly greater than `current` (exact comparison);
/// `100` when the list is exhausted.
pub fn pick_target(current: &Ratio, milestones: &Milestones) -> u8 {
    milestones
        .as_slice()
        .iter()
        .copied()
        .find(|&m| current.cmp_int(i128::from(m)) == Ordering::Less)
        .unwrap_or(FULL)
}

/// Convenience: pick against `tally.current_percent()`.
pub fn pick_target_for(tally: &Tally, milestones: &Milestones) -> u8 {
    pick_target(&tally.current_percent(), milestones)
}
