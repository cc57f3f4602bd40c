//! variables.rs: Parameter domains and `Params` with safe defaults.
//!
//! Newtypes validate on construction and on deserialization, so a loaded
//! parameter file can never carry an out-of-domain value into the algorithms.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CoreError;

/// ------------ Macros ------------

/// Define an enum with explicit wire tokens (serde derives are feature-aware).
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident => { $($variant:ident = $token:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub enum $name {
            $(
                #[cfg_attr(feature = "serde", serde(rename = $token))]
                $variant,
            )+
        }

        impl $name {
            pub fn as_token(self) -> &'static str {
                match self { $( $name::$variant => $token, )+ }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_token())
            }
        }

        impl core::str::FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $token => Ok($name::$variant), )+
                    _ => Err(CoreError::DomainOutOfRange(stringify!($name))),
                }
            }
        }
    };
}

/// ------------ Canonical enums (wire tokens explicit) ------------

wire_enum!(
    /// How the minimum positive count is turned into a number of events to collect.
    BufferStrategy => {
        Expected = "expected",
        Strict   = "strict"
    }
);

wire_enum!(
    /// What to do when the picked milestone cannot be exceeded.
    UnreachablePolicy => {
        Error    = "error",
        Fallback = "fallback"
    }
);

impl Default for BufferStrategy {
    fn default() -> Self { BufferStrategy::Expected }
}

impl Default for UnreachablePolicy {
    fn default() -> Self { UnreachablePolicy::Error }
}

/// ------------ Newtypes with invariants ------------

pub const DEFAULT_MILESTONES: [u8; 8] = [90, 93, 95, 96, 97, 98, 99, 100];

/// Ascending, duplicate-free list of target percentages in `1..=100`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestones(Vec<u8>);

impl Milestones {
    pub fn new(values: Vec<u8>) -> Result<Self, CoreError> {
        if values.is_empty() {
            return Err(CoreError::InvalidMilestones("list is empty"));
        }
        if values.iter().any(|&m| m == 0 || m > 100) {
            return Err(CoreError::InvalidMilestones("values must be in 1..=100"));
        }
        if values.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CoreError::InvalidMilestones("values must be strictly ascending"));
        }
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[u8] { &self.0 }

    /// Highest milestone strictly below 100, used when 100% is out of reach.
    pub fn highest_below_full(&self) -> Option<u8> {
        self.0.iter().rev().copied().find(|&m| m < 100)
    }
}

impl Default for Milestones {
    fn default() -> Self { Self(DEFAULT_MILESTONES.to_vec()) }
}

#[cfg(feature = "serde")]
impl Serialize for Milestones {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Milestones {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = Vec::<u8>::deserialize(d)?;
        Milestones::new(v).map_err(D::Error::custom)
    }
}

/// Parts-per-million scale used by `RiskFraction`.
pub const PPM: u32 = 1_000_000;

/// Expected share of new ratings that turn out negative, `0 <= r < 1`,
/// held exactly as parts per million.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RiskFraction(u32);

impl RiskFraction {
    pub const ZERO: RiskFraction = RiskFraction(0);

    pub fn from_ppm(ppm: u32) -> Result<Self, CoreError> {
        if ppm < PPM { Ok(Self(ppm)) } else { Err(CoreError::RiskOutOfRange) }
    }

    /// Round a real fraction to the nearest ppm. Anything in `[0, 1)` is
    /// accepted; values within half a ppm of 1 land on `PPM - 1`.
    pub fn from_f64(r: f64) -> Result<Self, CoreError> {
        if !r.is_finite() || !(0.0..1.0).contains(&r) {
            return Err(CoreError::RiskOutOfRange);
        }
        let ppm = ((r * PPM as f64).round() as u32).min(PPM - 1);
        Self::from_ppm(ppm)
    }

    pub fn ppm(self) -> u32 { self.0 }

    /// `1 - r` in ppm; always positive.
    pub fn keep_ppm(self) -> u32 { PPM - self.0 }

    pub fn as_f64(self) -> f64 { self.0 as f64 / PPM as f64 }

    /// Percent with trailing zeros trimmed: `15%`, `12.5%`, `0.0001%`.
    pub fn percent_display(self) -> String {
        // ppm / 10_000 = percent; four decimal places are exact.
        let whole = self.0 / 10_000;
        let frac = self.0 % 10_000;
        if frac == 0 {
            format!("{whole}%")
        } else {
            let digits = format!("{frac:04}");
            format!("{whole}.{}%", digits.trim_end_matches('0'))
        }
    }
}

impl Default for RiskFraction {
    fn default() -> Self { RiskFraction(150_000) }
}

#[cfg(feature = "serde")]
impl Serialize for RiskFraction {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(self.as_f64())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for RiskFraction {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = f64::deserialize(d)?;
        RiskFraction::from_f64(v).map_err(D::Error::custom)
    }
}

/// ------------ Params ------------

pub const DEFAULT_WORKERS: u32 = 5;

/// Upper bound on one day's headcount. Each worker gets its own row in the
/// plan, so the bound also caps plan size.
pub const MAX_WORKERS_PER_DAY: u32 = 10_000;

/// `n` if it is a usable per-day headcount.
pub fn check_workers(n: u32) -> Result<u32, CoreError> {
    if n <= MAX_WORKERS_PER_DAY {
        Ok(n)
    } else {
        Err(CoreError::DomainOutOfRange("workers per day (max 10000)"))
    }
}

#[cfg(feature = "serde")]
fn de_workers<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    check_workers(u32::deserialize(d)?).map_err(D::Error::custom)
}

/// Planner parameters. Every field is optional in a parameter file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Params {
    pub milestones: Milestones,
    pub risk: RiskFraction,
    pub buffer_strategy: BufferStrategy,
    /// Additive padding per worker per day, applied after day apportionment.
    pub extra_per_worker_per_day: u32,
    /// Headcount for dates missing from the schedule.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "de_workers"))]
    pub default_workers: u32,
    pub unreachable_policy: UnreachablePolicy,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            milestones: Milestones::default(),
            risk: RiskFraction::default(),
            buffer_strategy: BufferStrategy::default(),
            extra_per_worker_per_day: 0,
            default_workers: DEFAULT_WORKERS,
            unreachable_policy: UnreachablePolicy::default(),
        }
    }
}
