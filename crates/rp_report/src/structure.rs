//! crates/rp_report/src/structure.rs
//! Pure report data model. No I/O, no recomputation, no floats.

use chrono::NaiveDate;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportModel {
    pub header: HeaderBlock,
    pub summary: SummaryBlock,
    pub days: Vec<DayLine>,
    pub check: CheckBlock,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderBlock {
    pub plan_id: String,
    pub today: NaiveDate,
    pub window_end: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryBlock {
    pub current_percent: String, // "80.00"
    pub positive: u64,
    pub total: u64,
    pub target: u8,
    pub substituted_from: Option<u8>,
    pub needed_positive: u64,
    pub risk: String,            // "15%"
    pub buffer_strategy: String, // "expected" | "strict"
    pub events_needed: u64,
    pub padding_total: u64,
    pub grand_total: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayLine {
    pub date: NaiveDate,
    pub is_today: bool,
    pub workers: u32,
    pub base: u64,
    pub padding: u64,
    pub total: u64,
    pub per_worker: Vec<u64>,
    pub max_per_worker: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckBlock {
    pub allocated: u64,
    pub grand_total: u64,
    pub reconciled: bool,
    pub degenerate: bool,
}
