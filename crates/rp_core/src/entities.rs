//! entities.rs: Input tally and per-day capacity records.
//!
//! `Tally` can only be built through a checked constructor, so every value
//! downstream satisfies `positive <= total`.

use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::rounding::{new_ratio_checked, Ratio};

/// Upper bound on `total`; keeps every derived count well inside `u64`.
pub const MAX_TALLY: u64 = 1_000_000_000;

/// Running rating totals: all ratings so far and how many were positive.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Tally {
    total: u64,
    positive: u64,
}

impl Tally {
    pub fn new(total: u64, positive: u64) -> Result<Self, CoreError> {
        if total > MAX_TALLY {
            return Err(CoreError::DomainOutOfRange("total"));
        }
        if positive > total {
            return Err(CoreError::PositiveExceedsTotal { total, positive });
        }
        Ok(Self { total, positive })
    }

    /// Build from raw signed values as gathered by an input collaborator.
    pub fn from_signed(total: i64, positive: i64) -> Result<Self, CoreError> {
        if total < 0 {
            return Err(CoreError::NegativeCount("total"));
        }
        if positive < 0 {
            return Err(CoreError::NegativeCount("positive"));
        }
        Self::new(total as u64, positive as u64)
    }

    pub fn total(&self) -> u64 { self.total }
    pub fn positive(&self) -> u64 { self.positive }
    pub fn negative(&self) -> u64 { self.total - self.positive }

    /// `100 * positive / total`, or `0` when there are no ratings yet.
    pub fn current_percent(&self) -> Ratio {
        if self.total == 0 {
            return Ratio::ZERO;
        }
        new_ratio_checked(100 * self.positive as i128, self.total as i128).unwrap_or(Ratio::ZERO)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Tally {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw { total: u64, positive: u64 }
        let raw = Raw::deserialize(d)?;
        Tally::new(raw.total, raw.positive).map_err(serde::de::Error::custom)
    }
}

/// Workers available on one day of the planning window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DayCapacity {
    pub date: NaiveDate,
    pub workers: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_positive_above_total() {
        assert_eq!(
            Tally::new(10, 11),
            Err(CoreError::PositiveExceedsTotal { total: 10, positive: 11 })
        );
        assert!(Tally::new(10, 10).is_ok());
        assert!(Tally::new(0, 0).is_ok());
        assert_eq!(Tally::new(MAX_TALLY + 1, 0), Err(CoreError::DomainOutOfRange("total")));
    }

    #[test]
    fn rejects_negative_signed_inputs() {
        assert_eq!(Tally::from_signed(-1, 0), Err(CoreError::NegativeCount("total")));
        assert_eq!(Tally::from_signed(5, -1), Err(CoreError::NegativeCount("positive")));
        assert_eq!(Tally::from_signed(5, 3).unwrap().negative(), 2);
    }

    #[test]
    fn current_percent_is_exact() {
        let t = Tally::new(100, 80).unwrap();
        assert_eq!(t.current_percent().to_decimal_string(2), "80.00");
        let empty = Tally::new(0, 0).unwrap();
        assert_eq!(empty.current_percent(), Ratio::ZERO);
        let third = Tally::new(3, 1).unwrap();
        assert_eq!(third.current_percent(), Ratio { num: 100, den: 3 });
    }
}
