//! rp_core: Core types, parameter domains, exact ratios, and the capacity calendar.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! planner (`rp_io`, `rp_algo`, `rp_pipeline`, `rp_report`, `rp_cli`).
//!
//! - Inputs: `Tally` (total / positive ratings) with a checked constructor
//! - Parameter domains: `Milestones`, `RiskFraction`, `BufferStrategy`, `Params`
//! - Integer-first numerics & ratio helpers (no float on the hot path)
//! - `CapacityCalendar` capability + `StaticSchedule` table with a default
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod entities;
pub mod variables;
pub mod calendar;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        /// `positive` greater than `total`.
        PositiveExceedsTotal { total: u64, positive: u64 },
        /// A count that must be non-negative was negative.
        NegativeCount(&'static str),
        /// Risk fraction outside `[0, 1)` or not finite.
        RiskOutOfRange,
        /// Milestone list empty, unordered, duplicated or outside `1..=100`.
        InvalidMilestones(&'static str),
        InvalidRatio,
        DomainOutOfRange(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::PositiveExceedsTotal { total, positive } => {
                    write!(f, "positive ({positive}) must be in [0..total] (total = {total})")
                }
                CoreError::NegativeCount(k) => write!(f, "{k} must be >= 0"),
                CoreError::RiskOutOfRange => write!(f, "negative risk fraction must be in [0, 1)"),
                CoreError::InvalidMilestones(why) => write!(f, "invalid milestones: {why}"),
                CoreError::InvalidRatio => write!(f, "invalid ratio"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod rounding {
    //! Integer-first ratio type and helpers.

    use crate::errors::CoreError;
    use core::cmp::Ordering;

    /// Exact ratio with normalized sign and positive denominator.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Ratio {
        pub num: i128,
        pub den: i128,
    }

    fn gcd_i128(mut a: i128, mut b: i128) -> i128 {
        a = a.abs();
        b = b.abs();
        while b != 0 {
            let r = a % b;
            a = b;
            b = r;
        }
        if a == 0 { 1 } else { a }
    }

    /// Construct a ratio, ensuring `den > 0` and reducing by GCD.
    pub fn new_ratio_checked(num: i128, den: i128) -> Result<Ratio, CoreError> {
        if den == 0 { return Err(CoreError::InvalidRatio); }
        let (mut n, mut d) = (num, den);
        if d < 0 {
            n = -n;
            d = -d;
        }
        let g = gcd_i128(n, d);
        Ok(Ratio { num: n / g, den: d / g })
    }

    impl Ratio {
        pub const ZERO: Ratio = Ratio { num: 0, den: 1 };

        /// Exact comparison against an integer: `self` vs `k`.
        pub fn cmp_int(&self, k: i128) -> Ordering {
            self.num.cmp(&(k * self.den))
        }

        /// Render with `places` decimals, rounded half up (sign-aware).
        pub fn to_decimal_string(&self, places: u32) -> String {
            let scale = 10i128.pow(places);
            let neg = self.num < 0;
            let n = self.num.abs();
            let scaled = (2 * n * scale + self.den) / (2 * self.den);
            let int = scaled / scale;
            let frac = scaled % scale;
            let sign = if neg && scaled != 0 { "-" } else { "" };
            if places == 0 {
                format!("{sign}{int}")
            } else {
                format!("{sign}{int}.{frac:0width$}", width = places as usize)
            }
        }
    }

    /// Compare two ratios exactly (cross-multiply).
    pub fn compare_ratio(a: &Ratio, b: &Ratio) -> Ordering {
        // Reduce before cross-multiply to reduce overflow chance.
        let g1 = gcd_i128(a.num, b.num);
        let g2 = gcd_i128(a.den, b.den);
        let an = a.num / g1;
        let bn = b.num / g1;
        let ad = a.den / g2;
        let bd = b.den / g2;
        match (an.checked_mul(bd), bn.checked_mul(ad)) {
            (Some(l), Some(r)) => l.cmp(&r),
            _ => {
                // Only for extreme values; deterministic but lossy.
                let af = (a.num as f64) / (a.den as f64);
                let bf = (b.num as f64) / (b.den as f64);
                af.partial_cmp(&bf).unwrap_or(Ordering::Equal)
            }
        }
    }

    /// `ceil(num / den)` for non-negative `num` and positive `den`.
    #[inline]
    pub fn div_ceil_u128(num: u128, den: u128) -> u128 {
        debug_assert!(den > 0);
        if num == 0 { 0 } else { (num - 1) / den + 1 }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn ratio_reduces_and_normalizes_sign() {
            let r = new_ratio_checked(8000, -100).unwrap();
            assert_eq!(r, Ratio { num: -80, den: 1 });
            assert!(new_ratio_checked(1, 0).is_err());
        }

        #[test]
        fn decimal_string_rounds_half_up() {
            assert_eq!(new_ratio_checked(8000, 100).unwrap().to_decimal_string(2), "80.00");
            assert_eq!(new_ratio_checked(200, 3).unwrap().to_decimal_string(2), "66.67");
            assert_eq!(new_ratio_checked(100, 3).unwrap().to_decimal_string(2), "33.33");
            assert_eq!(new_ratio_checked(1, 8).unwrap().to_decimal_string(2), "0.13");
            assert_eq!(Ratio::ZERO.to_decimal_string(2), "0.00");
            assert_eq!(new_ratio_checked(-1, 8).unwrap().to_decimal_string(2), "-0.13");
        }

        #[test]
        fn compare_and_cmp_int() {
            let a = new_ratio_checked(9000, 100).unwrap();
            assert_eq!(a.cmp_int(90), Ordering::Equal);
            assert_eq!(a.cmp_int(93), Ordering::Less);
            let b = new_ratio_checked(181, 2).unwrap();
            assert_eq!(compare_ratio(&a, &b), Ordering::Less);
        }

        #[test]
        fn ceil_division() {
            assert_eq!(div_ceil_u128(0, 7), 0);
            assert_eq!(div_ceil_u128(14, 7), 2);
            assert_eq!(div_ceil_u128(15, 7), 3);
        }
    }
}

pub use entities::{DayCapacity, Tally};
pub use errors::CoreError;
pub use variables::{BufferStrategy, Milestones, Params, RiskFraction, UnreachablePolicy};
pub use calendar::{CapacityCalendar, StaticSchedule};
