//! ALLOCATE stage: events → days (weighted by headcount) → padding → workers.
//!
//! Input: buffered event count, the day plan from the capacity calendar, and
//! the additive per-worker padding.
//! Output: one `DayAllocation` per window day, in window order.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rp_algo::{apportion, split_even};
use rp_core::{variables::check_workers, DayCapacity};
use tracing::{debug, warn};

use crate::PipelineError;

/// Allocation for a single day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayAllocation {
    pub date: NaiveDate,
    pub workers: u32,
    /// Share of the buffered requirement.
    pub base: u64,
    /// `extra_per_worker_per_day * workers`.
    pub padding: u64,
    /// `base + padding`.
    pub total: u64,
    /// Worker number (1-based) → ratings to collect.
    pub per_worker: BTreeMap<u32, u64>,
}

impl DayAllocation {
    /// Largest single-worker share, shown as the per-worker figure.
    pub fn max_per_worker(&self) -> u64 {
        self.per_worker.values().copied().max().unwrap_or(0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationOutcome {
    pub days: Vec<DayAllocation>,
    /// Sum of `padding` over all days.
    pub padding_total: u64,
    /// Sum of `total` over all days.
    pub allocated_total: u64,
    /// Positive requirement with zero capacity in the whole window.
    pub degenerate: bool,
}

fn overflow(what: &str) -> PipelineError {
    PipelineError::InvalidInput(format!("{what} does not fit in 64 bits"))
}

pub fn allocate_days(
    events: u64,
    plan: &[DayCapacity],
    extra_per_worker_per_day: u32,
) -> Result<AllocationOutcome, PipelineError> {
    // Calendars other than `StaticSchedule` are unchecked; one row per worker.
    for d in plan {
        check_workers(d.workers)?;
    }

    let buckets: Vec<(NaiveDate, u64)> = plan.iter().map(|d| (d.date, u64::from(d.workers))).collect();
    let by_day = apportion(events, &buckets)?;

    if by_day.degenerate {
        warn!(events, days = plan.len(), "no worker capacity in window; allocation is all zero");
    }

    let mut days = Vec::with_capacity(plan.len());
    let mut padding_total = 0u64;
    let mut allocated_total = 0u64;
    for d in plan {
        let base = by_day.get(&d.date);
        let padding = u64::from(extra_per_worker_per_day)
            .checked_mul(u64::from(d.workers))
            .ok_or_else(|| overflow("day padding"))?;
        let total = base.checked_add(padding).ok_or_else(|| overflow("day total"))?;
        padding_total = padding_total.checked_add(padding).ok_or_else(|| overflow("padding total"))?;
        allocated_total = allocated_total.checked_add(total).ok_or_else(|| overflow("allocated total"))?;
        let per_worker = split_even(total, d.workers);
        debug!(date = %d.date, workers = d.workers, base, padding, "day allocated");
        days.push(DayAllocation { date: d.date, workers: d.workers, base, padding, total, per_worker });
    }

    Ok(AllocationOutcome { days, padding_total, allocated_total, degenerate: by_day.degenerate })
}
