//! rp_report/src/lib.rs: Pure offline report model + renderers (JSON/text).
//!
//! Determinism rules:
//! - No network, no I/O here. Callers supply the `PlanDoc` already in memory.
//! - Renderers read the model only; no figure is recomputed from the tally.
//! - Stable section order and field names.

#![deny(unsafe_code)]

use chrono::NaiveDate;
use rp_pipeline::{PlanDoc, PlanStatus};

pub mod structure;

#[cfg(feature = "render_json")]
pub mod render_json;
#[cfg(feature = "render_text")]
pub mod render_text;

pub use structure::{CheckBlock, DayLine, HeaderBlock, ReportModel, SummaryBlock};

#[cfg(feature = "render_json")]
pub use render_json::render_json;
#[cfg(feature = "render_text")]
pub use render_text::render_text;

// ===== Errors =====
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    Inconsistent(&'static str),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Inconsistent(what) => write!(f, "inconsistent plan: {what}"),
        }
    }
}

impl std::error::Error for ReportError {}

// ===== API =====

/// Build the report model from a plan (pure, offline).
///
/// Rejects plans whose rows disagree with their own totals; a hand-edited or
/// truncated plan file should not render as if it were valid.
pub fn build_model(plan: &PlanDoc) -> Result<ReportModel, ReportError> {
    if plan.days.iter().any(|d| d.per_worker.len() != d.workers as usize) {
        return Err(ReportError::Inconsistent("per-worker parts do not match headcount"));
    }
    if plan.days.iter().any(|d| d.base.checked_add(d.padding) != Some(d.total)) {
        return Err(ReportError::Inconsistent("day total is not base + padding"));
    }
    if plan.days.iter().any(|d| sum_checked(d.per_worker.iter().copied()) != Some(d.total)) {
        return Err(ReportError::Inconsistent("per-worker parts do not sum to the day total"));
    }
    let allocated = sum_checked(plan.days.iter().map(|d| d.total))
        .ok_or(ReportError::Inconsistent("allocated total overflows"))?;

    let header = HeaderBlock {
        plan_id: plan.id.clone(),
        today: plan.today,
        window_end: plan.window_end,
    };

    let summary = SummaryBlock {
        current_percent: plan.current_percent.display.clone(),
        positive: plan.tally.positive,
        total: plan.tally.total,
        target: plan.target,
        substituted_from: plan.substituted_from,
        needed_positive: plan.needed_positive,
        risk: plan.risk.display.clone(),
        buffer_strategy: plan.buffer_strategy.as_token().to_string(),
        events_needed: plan.events_needed,
        padding_total: plan.padding_total,
        grand_total: plan.grand_total,
    };

    let days = plan
        .days
        .iter()
        .map(|d| DayLine {
            date: d.date,
            is_today: d.date == plan.today,
            workers: d.workers,
            base: d.base,
            padding: d.padding,
            total: d.total,
            per_worker: d.per_worker.clone(),
            max_per_worker: d.max_per_worker,
        })
        .collect();

    let check = CheckBlock {
        allocated,
        grand_total: plan.grand_total,
        reconciled: plan.reconciled,
        degenerate: plan.status == PlanStatus::Degenerate,
    };

    Ok(ReportModel { header, summary, days, check })
}

fn sum_checked(mut it: impl Iterator<Item = u64>) -> Option<u64> {
    it.try_fold(0u64, |acc, n| acc.checked_add(n))
}

/// ISO date, used by both renderers.
pub(crate) fn iso(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}
