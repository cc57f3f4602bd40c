//! End-to-end runs of the plan pipeline against synthetic calendars.

use chrono::NaiveDate;
use proptest::prelude::*;
use rp_core::{
    variables::{BufferStrategy, Params, RiskFraction, UnreachablePolicy},
    CapacityCalendar, StaticSchedule, Tally,
};
use rp_pipeline::{run_from_raw, run_plan, Overrides, PipelineError, PlanStatus};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Same headcount every day.
struct Flat(u32);

impl CapacityCalendar for Flat {
    fn capacity_for_day(&self, _date: NaiveDate) -> u32 {
        self.0
    }
}

/// Fixed three-day window regardless of `today`.
struct ThreeDays;

impl CapacityCalendar for ThreeDays {
    fn capacity_for_day(&self, date: NaiveDate) -> u32 {
        match date.format("%d").to_string().as_str() {
            "01" => 5,
            "02" => 7,
            _ => 6,
        }
    }

    fn days_in_window(&self, _today: NaiveDate) -> Vec<NaiveDate> {
        vec![d("2026-03-01"), d("2026-03-02"), d("2026-03-03")]
    }
}

fn january_schedule() -> StaticSchedule {
    let counts = [5, 7, 6, 5, 6, 6, 6, 4, 8, 8, 6, 6, 6, 7, 6, 8, 6];
    StaticSchedule::from_entries(
        5,
        counts.iter().enumerate().map(|(i, &n)| (d("2026-01-15") + chrono::Days::new(i as u64), n)),
    )
    .unwrap()
}

#[test]
fn below_ninety_percent() {
    let tally = Tally::new(100, 80).unwrap();
    let doc = run_plan(&tally, &Params::default(), &ThreeDays, d("2026-03-01")).unwrap();

    assert_eq!(doc.current_percent.display, "80.00");
    assert_eq!(doc.target, 90);
    assert_eq!(doc.needed_positive, 101);
    assert_eq!(doc.events_needed, 119);
    assert_eq!(doc.grand_total, 119);
    assert_eq!(doc.days.iter().map(|r| r.base).collect::<Vec<_>>(), vec![33, 46, 40]);
    assert!(doc.reconciled);
    assert_eq!(doc.status, PlanStatus::Ok);
    for row in &doc.days {
        assert_eq!(row.per_worker.len(), row.workers as usize);
        assert_eq!(row.per_worker.iter().sum::<u64>(), row.total);
    }
}

#[test]
fn already_perfect() {
    let tally = Tally::new(50, 50).unwrap();
    let doc = run_plan(&tally, &Params::default(), &Flat(4), d("2026-01-30")).unwrap();
    assert_eq!(doc.target, 100);
    assert_eq!(doc.needed_positive, 0);
    assert_eq!(doc.events_needed, 0);
    assert_eq!(doc.grand_total, 0);
    assert!(doc.days.iter().all(|r| r.total == 0));
    assert!(doc.reconciled);
}

#[test]
fn unreachable_full_target() {
    let tally = Tally::new(50, 45).unwrap();
    // Above every milestone below 100, the picker lands on 100.
    let err = run_plan(&Tally::new(1000, 999).unwrap(), &Params::default(), &Flat(4), d("2026-01-30"))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Unreachable { target: 100, .. }));

    // 45/50 is exactly 90%, which picks 93 from the default list; with only
    // the full milestone configured the same tally is unreachable.
    let only_full = Params { milestones: rp_core::Milestones::new(vec![100]).unwrap(), ..Params::default() };
    let err = run_plan(&tally, &only_full, &Flat(4), d("2026-01-30")).unwrap_err();
    assert!(matches!(err, PipelineError::Unreachable { target: 100, .. }));
}

#[test]
fn fallback_records_substitution() {
    let params = Params { unreachable_policy: UnreachablePolicy::Fallback, ..Params::default() };
    let tally = Tally::new(2000, 1979).unwrap(); // 98.95%
    let doc = run_plan(&tally, &params, &Flat(5), d("2026-01-30")).unwrap();
    assert_eq!(doc.target, 99);
    assert_eq!(doc.substituted_from, None);

    let tally = Tally::new(1000, 995).unwrap(); // 99.5%
    let doc = run_plan(&tally, &params, &Flat(5), d("2026-01-30")).unwrap();
    assert_eq!(doc.target, 99);
    assert_eq!(doc.substituted_from, Some(100));
    assert_eq!(doc.needed_positive, 0);
}

#[test]
fn zero_capacity_is_degenerate_not_error() {
    let tally = Tally::new(100, 80).unwrap();
    let doc = run_plan(&tally, &Params::default(), &Flat(0), d("2026-01-30")).unwrap();
    assert_eq!(doc.status, PlanStatus::Degenerate);
    assert_eq!(doc.events_needed, 119);
    assert!(doc.days.iter().all(|r| r.total == 0));
    assert!(!doc.reconciled);
}

#[test]
fn oversized_calendar_headcount_is_rejected_before_allocation() {
    let tally = Tally::new(100, 80).unwrap();
    let err = run_plan(&tally, &Params::default(), &Flat(3_000_000), d("2026-01-29")).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(_)), "{err}");
}

#[test]
fn padding_adds_to_grand_total() {
    let tally = Tally::new(100, 80).unwrap();
    let params = Params { extra_per_worker_per_day: 2, ..Params::default() };
    let doc = run_plan(&tally, &params, &ThreeDays, d("2026-03-01")).unwrap();
    assert_eq!(doc.padding_total, 2 * (5 + 7 + 6));
    assert_eq!(doc.grand_total, 119 + 36);
    assert_eq!(doc.days.iter().map(|r| r.total).sum::<u64>(), doc.grand_total);
    assert!(doc.reconciled);
}

#[test]
fn static_schedule_window_runs_to_month_end() {
    let tally = Tally::new(300, 270).unwrap();
    let doc = run_plan(&tally, &Params::default(), &january_schedule(), d("2026-01-29")).unwrap();
    assert_eq!(doc.window_end, d("2026-01-31"));
    assert_eq!(doc.days.iter().map(|r| r.workers).collect::<Vec<_>>(), vec![6, 8, 6]);
    assert_eq!(doc.days.iter().map(|r| r.base).sum::<u64>(), doc.events_needed);

    // Dates past the table fall back to the default headcount.
    let doc = run_plan(&tally, &Params::default(), &january_schedule(), d("2026-02-27")).unwrap();
    assert!(doc.days.iter().all(|r| r.workers == 5));
    assert_eq!(doc.window_end, d("2026-02-28"));
}

#[test]
fn strict_strategy_can_be_unreachable() {
    let err = run_from_raw(
        100,
        80,
        Params::default(),
        &Overrides { buffer_strategy: Some(BufferStrategy::Strict), ..Default::default() },
        &Flat(5),
        d("2026-01-30"),
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::Unreachable { target: 90, .. }));
}

#[test]
fn raw_inputs_are_validated() {
    for (total, positive) in [(-1, 0), (10, -1), (10, 11)] {
        let err = run_from_raw(total, positive, Params::default(), &Overrides::default(), &Flat(5), d("2026-01-30"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)), "{total}/{positive}");
    }
    let bad_risk = Overrides { risk: Some(1.5), ..Default::default() };
    assert!(matches!(
        run_from_raw(10, 5, Params::default(), &bad_risk, &Flat(5), d("2026-01-30")),
        Err(PipelineError::InvalidInput(_))
    ));
}

#[test]
fn identical_inputs_identical_ids() {
    let tally = Tally::new(640, 601).unwrap();
    let a = run_plan(&tally, &Params::default(), &january_schedule(), d("2026-01-20")).unwrap();
    let b = run_plan(&tally, &Params::default(), &january_schedule(), d("2026-01-20")).unwrap();
    assert_eq!(a, b);
    let c = run_plan(&tally, &Params::default(), &january_schedule(), d("2026-01-21")).unwrap();
    assert_ne!(a.id, c.id);
}

proptest! {
    #[test]
    fn every_plan_reconciles_with_capacity(
        total in 0u64..5_000,
        pos_share in 0u64..=1000,
        workers in 1u32..12,
        risk_ppm in 0u32..500_000,
        extra in 0u32..4,
    ) {
        let positive = total * pos_share / 1000;
        let tally = Tally::new(total, positive).unwrap();
        let params = Params {
            risk: RiskFraction::from_ppm(risk_ppm).unwrap(),
            extra_per_worker_per_day: extra,
            unreachable_policy: UnreachablePolicy::Fallback,
            ..Params::default()
        };
        let doc = run_plan(&tally, &params, &Flat(workers), d("2026-01-20")).unwrap();
        prop_assert!(doc.reconciled);
        prop_assert_eq!(doc.days.len(), 12);
        prop_assert_eq!(doc.days.iter().map(|r| r.total).sum::<u64>(), doc.grand_total);
        for row in &doc.days {
            let lo = row.per_worker.iter().min().copied().unwrap_or(0);
            let hi = row.per_worker.iter().max().copied().unwrap_or(0);
            prop_assert!(hi - lo <= 1);
        }
    }
}
