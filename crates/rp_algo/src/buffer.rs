//! Risk buffering: how many ratings to collect so that, with a share `r` of
//! them turning out negative, enough positives still land.
//!
//! Two strategies, both integer-exact over the ppm representation of `r`:
//! - `Expected`: least `N` with `floor(N * (1 - r)) >= needed`, i.e.
//!   `ceil(needed / (1 - r))`.
//! - `Strict`: least `N` with
//!   `100 * (positive + floor(N * (1 - r))) > target * (total + N)`; the
//!   negatives among the new ratings also count against the ratio.

use rp_core::{
    rounding::div_ceil_u128,
    variables::{BufferStrategy, RiskFraction, PPM},
    Tally,
};

use crate::requirement::{min_positive_needed, Requirement};

/// `ceil(needed / (1 - r))`; `0` when nothing is needed.
pub fn buffer_expected(needed: u64, risk: RiskFraction) -> u64 {
    if needed == 0 {
        return 0;
    }
    let n = div_ceil_u128(u128::from(needed) * u128::from(PPM), u128::from(risk.keep_ppm()));
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// Least total `N` of new ratings whose worst-case positive share still lifts
/// the ratio strictly above `target`.
///
/// Returns `Unreachable` when `target` is 100 with a negative on record, or
/// when `100 * (1 - r) <= target` (new ratings at that rate can never push the
/// ratio above the target).
pub fn buffer_strict(tally: &Tally, target: u8, risk: RiskFraction) -> Requirement {
    let total = i128::from(tally.total());
    let positive = i128::from(tally.positive());
    let t = i128::from(target);
    let d = i128::from(PPM);
    let q = i128::from(risk.keep_ppm());

    if t >= 100 {
        return min_positive_needed(tally, target);
    }

    let b = t * total - 100 * positive;
    if b < 0 {
        return Requirement::Needed(0);
    }

    // Growth of `100 * positives - target * ratings` per new rating, scaled by `d`.
    let slope = 100 * q - t * d;
    if slope <= 0 {
        return Requirement::Unreachable;
    }

    // Without the floor, N * slope > b * d is exact; the floor loses less than
    // one positive (100 units), so the answer lies in [lo, hi].
    let lo = b * d / slope + 1;
    let hi = (b + 100) * d / slope + 1;

    // N clears iff floor(N*q/d) >= k(N) = floor((t*N + b) / 100) + 1, i.e.
    // N >= ceil(k(N) * d / q). Both sides are monotone in N, so jumping to the
    // right-hand side never skips a solution.
    let mut n = lo;
    while n < hi {
        let k = (t * n + b) / 100 + 1;
        let least = (k * d + q - 1) / q;
        if least <= n {
            break;
        }
        n = least;
    }
    Requirement::Needed(u64::try_from(n.min(hi)).unwrap_or(u64::MAX))
}

/// Dispatch on `strategy`. `needed` is the solver's answer for the same
/// tally and target.
pub fn events_needed(
    strategy: BufferStrategy,
    tally: &Tally,
    target: u8,
    needed: u64,
    risk: RiskFraction,
) -> Requirement {
    match strategy {
        BufferStrategy::Expected => Requirement::Needed(buffer_expected(needed, risk)),
        BufferStrategy::Strict => buffer_strict(tally, target, risk),
    }
}
