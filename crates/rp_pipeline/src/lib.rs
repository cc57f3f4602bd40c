//! rp_pipeline: deterministic plan pipeline (validate→target→solve→buffer→allocate→build)
//! This crate stays I/O-free apart from hashing through `rp_io`, and delegates
//! the math to `rp_algo`. Capacity comes from an injected `CapacityCalendar`.

#![forbid(unsafe_code)]

use chrono::NaiveDate;
use rp_core::{errors::CoreError, variables::Params, CapacityCalendar, Tally};
use thiserror::Error;
use tracing::info;

pub mod allocate;
pub mod build_plan;
pub mod solve;
pub mod validate;

pub use allocate::{allocate_days, AllocationOutcome, DayAllocation};
pub use build_plan::{build_plan, plan_id_for, DayRow, PercentEcho, PlanDoc, PlanStatus, RiskEcho, TallyEcho};
pub use solve::{buffered_events, choose_target, TargetChoice};
pub use validate::{apply_overrides, validate_tally, Overrides};

/// Single error surface for the pipeline orchestration.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("target {target}% is unreachable: {reason}")]
    Unreachable { target: u8, reason: String },

    #[error("allocation failed: {0}")]
    Allocate(#[from] rp_algo::AllocError),

    #[error("io: {0}")]
    Io(String),

    #[error("build: {0}")]
    Build(String),
}

impl From<CoreError> for PipelineError {
    fn from(e: CoreError) -> Self {
        PipelineError::InvalidInput(e.to_string())
    }
}

impl From<rp_io::IoError> for PipelineError {
    fn from(e: rp_io::IoError) -> Self {
        use rp_io::IoError;
        match e {
            IoError::Json { pointer, msg } => PipelineError::Io(format!("json {pointer}: {msg}")),
            IoError::Path(m) => PipelineError::Io(format!("path: {m}")),
            IoError::Limit(m) => PipelineError::Io(format!("limit: {m}")),
            IoError::Invalid(m) => PipelineError::InvalidInput(m),
            IoError::Hash(m) => PipelineError::Build(format!("hash: {m}")),
        }
    }
}

/// Run the whole pipeline for one tally against `calendar`, planning from `today`.
pub fn run_plan<C: CapacityCalendar + ?Sized>(
    tally: &Tally,
    params: &Params,
    calendar: &C,
    today: NaiveDate,
) -> Result<PlanDoc, PipelineError> {
    // --- TARGET + SOLVE (unreachable stops before any buffering) ---
    let choice = choose_target(tally, params)?;

    // --- BUFFER ---
    let events = buffered_events(tally, &choice, params)?;

    // --- ALLOCATE ---
    let day_plan = calendar.day_plan(today);
    let alloc = allocate_days(events, &day_plan, params.extra_per_worker_per_day)?;

    // --- BUILD ---
    let doc = build_plan(today, tally, params, &choice, events, alloc)?;
    info!(
        id = %doc.id,
        target = doc.target,
        needed = doc.needed_positive,
        events = doc.events_needed,
        grand_total = doc.grand_total,
        days = doc.days.len(),
        reconciled = doc.reconciled,
        "plan built"
    );
    Ok(doc)
}

/// Validate raw counts, layer `overrides` over `params`, and run.
pub fn run_from_raw<C: CapacityCalendar + ?Sized>(
    total: i64,
    positive: i64,
    params: Params,
    overrides: &Overrides,
    calendar: &C,
    today: NaiveDate,
) -> Result<PlanDoc, PipelineError> {
    let tally = validate_tally(total, positive)?;
    let params = apply_overrides(params, overrides)?;
    run_plan(&tally, &params, calendar, today)
}
