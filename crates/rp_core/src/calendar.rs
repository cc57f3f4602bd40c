//! calendar.rs: Planning window and the injected capacity capability.
//!
//! The planner never owns the schedule. It asks a `CapacityCalendar` how many
//! workers are on a date and which dates remain in the window. `StaticSchedule`
//! is the table-backed implementation (date → headcount, default for misses).

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::entities::DayCapacity;
use crate::errors::CoreError;
use crate::variables::{check_workers, DEFAULT_WORKERS};

/// Last calendar day of `d`'s month (December rolls into next January).
pub fn last_day_of_month(d: NaiveDate) -> NaiveDate {
    let (y, m) = if d.month() == 12 { (d.year() + 1, 1) } else { (d.year(), d.month() + 1) };
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// `today` through the last day of its month, inclusive, ascending.
pub fn window_days(today: NaiveDate) -> Vec<NaiveDate> {
    let end = last_day_of_month(today);
    today.iter_days().take_while(|d| *d <= end).collect()
}

/// Source of per-day worker headcounts.
pub trait CapacityCalendar {
    /// Workers available on `date` (never fails; unmapped dates use a default).
    fn capacity_for_day(&self, date: NaiveDate) -> u32;

    /// Dates to plan over, ascending.
    fn days_in_window(&self, today: NaiveDate) -> Vec<NaiveDate> {
        window_days(today)
    }

    /// Window dates paired with their headcount.
    fn day_plan(&self, today: NaiveDate) -> Vec<DayCapacity> {
        self.days_in_window(today)
            .into_iter()
            .map(|date| DayCapacity { date, workers: self.capacity_for_day(date) })
            .collect()
    }
}

impl<C: CapacityCalendar + ?Sized> CapacityCalendar for &C {
    fn capacity_for_day(&self, date: NaiveDate) -> u32 {
        (**self).capacity_for_day(date)
    }

    fn days_in_window(&self, today: NaiveDate) -> Vec<NaiveDate> {
        (**self).days_in_window(today)
    }
}

/// Date → headcount table with a fallback for dates it does not list.
/// Every headcount it holds is at most `MAX_WORKERS_PER_DAY`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticSchedule {
    by_date: BTreeMap<NaiveDate, u32>,
    default_workers: u32,
}

impl StaticSchedule {
    pub fn new(default_workers: u32) -> Result<Self, CoreError> {
        Ok(Self { by_date: BTreeMap::new(), default_workers: check_workers(default_workers)? })
    }

    pub fn from_entries<I: IntoIterator<Item = (NaiveDate, u32)>>(
        default_workers: u32,
        entries: I,
    ) -> Result<Self, CoreError> {
        entries.into_iter().try_fold(Self::new(default_workers)?, |s, (date, n)| s.with_day(date, n))
    }

    pub fn with_day(mut self, date: NaiveDate, workers: u32) -> Result<Self, CoreError> {
        self.by_date.insert(date, check_workers(workers)?);
        Ok(self)
    }

    pub fn default_workers(&self) -> u32 { self.default_workers }

    pub fn set_default_workers(&mut self, n: u32) -> Result<(), CoreError> {
        self.default_workers = check_workers(n)?;
        Ok(())
    }

    pub fn entries(&self) -> &BTreeMap<NaiveDate, u32> { &self.by_date }
}

impl Default for StaticSchedule {
    fn default() -> Self { Self { by_date: BTreeMap::new(), default_workers: DEFAULT_WORKERS } }
}

impl CapacityCalendar for StaticSchedule {
    fn capacity_for_day(&self, date: NaiveDate) -> u32 {
        self.by_date.get(&date).copied().unwrap_or(self.default_workers)
    }
}
