//! BUILD_PLAN stage: assemble the `PlanDoc` and stamp its content id.
//!
//! The id is `PLAN:` + SHA-256 of the canonical JSON of the document with the
//! `id` field removed, so equal inputs always produce equal ids.

use chrono::NaiveDate;
use rp_core::{
    variables::{BufferStrategy, Params},
    Tally,
};
use serde::{Deserialize, Serialize};

use crate::allocate::AllocationOutcome;
use crate::solve::TargetChoice;
use crate::PipelineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Ok,
    Degenerate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyEcho {
    pub total: u64,
    pub positive: u64,
    pub negative: u64,
}

/// Exact `num/den` percentage plus its two-decimal rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentEcho {
    pub num: i128,
    pub den: i128,
    pub display: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskEcho {
    pub ppm: u32,
    pub display: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRow {
    pub date: NaiveDate,
    pub workers: u32,
    pub base: u64,
    pub padding: u64,
    pub total: u64,
    /// Index `i` is worker number `i + 1`.
    pub per_worker: Vec<u64>,
    pub max_per_worker: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDoc {
    pub id: String, // "PLAN:<hex64>"
    pub today: NaiveDate,
    pub window_end: NaiveDate,
    pub tally: TallyEcho,
    pub current_percent: PercentEcho,
    pub target: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substituted_from: Option<u8>,
    pub needed_positive: u64,
    pub risk: RiskEcho,
    pub buffer_strategy: BufferStrategy,
    pub events_needed: u64,
    pub padding_total: u64,
    pub grand_total: u64,
    pub status: PlanStatus,
    pub days: Vec<DayRow>,
    /// Per-day totals sum to `grand_total`.
    pub reconciled: bool,
}

pub fn build_plan(
    today: NaiveDate,
    tally: &Tally,
    params: &Params,
    choice: &TargetChoice,
    events: u64,
    alloc: AllocationOutcome,
) -> Result<PlanDoc, PipelineError> {
    let current = tally.current_percent();
    let padding_total = alloc.padding_total;
    let grand_total = events
        .checked_add(padding_total)
        .ok_or_else(|| PipelineError::InvalidInput("grand total does not fit in 64 bits".into()))?;
    let reconciled = alloc.allocated_total == grand_total;
    let window_end = alloc.days.last().map(|d| d.date).unwrap_or(today);

    let days = alloc
        .days
        .into_iter()
        .map(|d| DayRow {
            max_per_worker: d.max_per_worker(),
            date: d.date,
            workers: d.workers,
            base: d.base,
            padding: d.padding,
            total: d.total,
            per_worker: d.per_worker.into_values().collect(),
        })
        .collect();

    let mut doc = PlanDoc {
        id: String::new(),
        today,
        window_end,
        tally: TallyEcho { total: tally.total(), positive: tally.positive(), negative: tally.negative() },
        current_percent: PercentEcho { num: current.num, den: current.den, display: current.to_decimal_string(2) },
        target: choice.target,
        substituted_from: choice.substituted_from,
        needed_positive: choice.needed_positive,
        risk: RiskEcho { ppm: params.risk.ppm(), display: params.risk.percent_display() },
        buffer_strategy: params.buffer_strategy,
        events_needed: events,
        padding_total,
        grand_total,
        status: if alloc.degenerate { PlanStatus::Degenerate } else { PlanStatus::Ok },
        days,
        reconciled,
    };
    doc.id = plan_id_for(&doc)?;
    Ok(doc)
}

/// Content id of `doc`, ignoring whatever its `id` field currently holds.
pub fn plan_id_for(doc: &PlanDoc) -> Result<String, PipelineError> {
    let mut v = serde_json::to_value(doc).map_err(|e| PipelineError::Build(format!("serialize plan: {e}")))?;
    if let Some(obj) = v.as_object_mut() {
        obj.remove("id");
    }
    Ok(rp_io::hasher::plan_id(&v)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocate::allocate_days;
    use rp_core::DayCapacity;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> PlanDoc {
        let tally = Tally::new(100, 80).unwrap();
        let params = Params::default();
        let choice = TargetChoice { target: 90, substituted_from: None, needed_positive: 101 };
        let plan = [DayCapacity { date: d("2026-01-30"), workers: 8 }, DayCapacity { date: d("2026-01-31"), workers: 6 }];
        let alloc = allocate_days(119, &plan, 1).unwrap();
        build_plan(d("2026-01-30"), &tally, &params, &choice, 119, alloc).unwrap()
    }

    #[test]
    fn totals_and_echoes() {
        let doc = sample();
        assert_eq!(doc.current_percent.display, "80.00");
        assert_eq!(doc.risk.display, "15%");
        assert_eq!(doc.padding_total, 14);
        assert_eq!(doc.grand_total, 133);
        assert!(doc.reconciled);
        assert_eq!(doc.window_end, d("2026-01-31"));
        assert_eq!(doc.status, PlanStatus::Ok);
        assert_eq!(doc.days[0].per_worker.len(), 8);
    }

    #[test]
    fn id_is_stable_and_ignores_id_field() {
        let a = sample();
        let mut b = sample();
        assert_eq!(a.id, b.id);
        assert!(rp_io::hasher::is_plan_id(&a.id));
        b.id = "PLAN:whatever".into();
        assert_eq!(plan_id_for(&b).unwrap(), a.id);
        b.grand_total += 1;
        assert_ne!(plan_id_for(&b).unwrap(), a.id);
    }

    #[test]
    fn wire_shape() {
        let v = serde_json::to_value(sample()).unwrap();
        assert_eq!(v["status"], "ok");
        assert_eq!(v["buffer_strategy"], "expected");
        assert_eq!(v["days"][0]["date"], "2026-01-30");
        assert!(v.get("substituted_from").is_none());
    }
}
