//! crates/rp_pipeline/src/validate.rs
//! Input checks before any computation.
//!
//! Raw values arrive signed and loosely typed (flags, parameter files). Everything
//! leaving this module is a domain type, so later stages never re-check ranges.

use rp_core::{
    variables::{check_workers, BufferStrategy, Milestones, Params, RiskFraction, UnreachablePolicy},
    Tally,
};

use crate::PipelineError;

/// Caller-supplied values that take precedence over a loaded `Params`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    pub risk: Option<f64>,
    pub extra_per_worker_per_day: Option<i64>,
    pub buffer_strategy: Option<BufferStrategy>,
    pub milestones: Option<Vec<u8>>,
    pub default_workers: Option<u32>,
    /// Force the fallback policy on; `false` leaves the loaded policy alone.
    pub fallback_milestone: bool,
}

/// Checked tally from raw signed counts.
pub fn validate_tally(total: i64, positive: i64) -> Result<Tally, PipelineError> {
    Ok(Tally::from_signed(total, positive)?)
}

/// Layer `o` over `base`. Out-of-domain overrides abort with `InvalidInput`.
pub fn apply_overrides(base: Params, o: &Overrides) -> Result<Params, PipelineError> {
    let mut p = base;

    if let Some(r) = o.risk {
        p.risk = RiskFraction::from_f64(r)?;
    }
    if let Some(extra) = o.extra_per_worker_per_day {
        p.extra_per_worker_per_day = u32::try_from(extra).map_err(|_| {
            PipelineError::InvalidInput(format!(
                "extra per worker per day must be in 0..={}, got {extra}",
                u32::MAX
            ))
        })?;
    }
    if let Some(s) = o.buffer_strategy {
        p.buffer_strategy = s;
    }
    if let Some(m) = &o.milestones {
        p.milestones = Milestones::new(m.clone())?;
    }
    if let Some(n) = o.default_workers {
        p.default_workers = check_workers(n)?;
    }
    if o.fallback_milestone {
        p.unreachable_policy = UnreachablePolicy::Fallback;
    }
    Ok(p)
}
