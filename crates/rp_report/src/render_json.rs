//! render_json.rs: Report JSON renderer (header → summary → days → check).
//!
//! Object key order follows insertion order (`serde_json/preserve_order`), so
//! sections come out in reading order. The canonical plan artifact is written
//! separately by `rp_io` with sorted keys.

use serde_json::{Map as JsonMap, Value};

use crate::structure::{CheckBlock, DayLine, HeaderBlock, ReportModel, SummaryBlock};
use crate::iso;

/// Build the top-level report object.
pub fn render_json(m: &ReportModel) -> Value {
    let mut root = obj();
    root.insert("header".into(), header_json(&m.header));
    root.insert("summary".into(), summary_json(&m.summary));
    root.insert("days".into(), Value::Array(m.days.iter().map(day_json).collect()));
    root.insert("check".into(), check_json(&m.check));
    Value::Object(root)
}

/* ----------------------- sections ----------------------- */

fn header_json(h: &HeaderBlock) -> Value {
    let mut o = obj();
    o.insert("plan_id".into(), Value::String(h.plan_id.clone()));
    o.insert("today".into(), Value::String(iso(h.today)));
    o.insert("window_end".into(), Value::String(iso(h.window_end)));
    Value::Object(o)
}

fn summary_json(s: &SummaryBlock) -> Value {
    let mut o = obj();
    o.insert("current_percent".into(), Value::String(format!("{}%", s.current_percent)));
    o.insert("positive".into(), s.positive.into());
    o.insert("total".into(), s.total.into());
    o.insert("target".into(), s.target.into());
    if let Some(from) = s.substituted_from {
        o.insert("substituted_from".into(), from.into());
    }
    o.insert("needed_positive".into(), s.needed_positive.into());
    o.insert("risk".into(), Value::String(s.risk.clone()));
    o.insert("buffer_strategy".into(), Value::String(s.buffer_strategy.clone()));
    o.insert("events_needed".into(), s.events_needed.into());
    o.insert("padding_total".into(), s.padding_total.into());
    o.insert("grand_total".into(), s.grand_total.into());
    Value::Object(o)
}

fn day_json(d: &DayLine) -> Value {
    let mut o = obj();
    o.insert("date".into(), Value::String(iso(d.date)));
    o.insert("today".into(), Value::Bool(d.is_today));
    o.insert("workers".into(), d.workers.into());
    o.insert("base".into(), d.base.into());
    o.insert("padding".into(), d.padding.into());
    o.insert("total".into(), d.total.into());
    o.insert("per_worker".into(), Value::Array(d.per_worker.iter().map(|&n| n.into()).collect()));
    o.insert("max_per_worker".into(), d.max_per_worker.into());
    Value::Object(o)
}

fn check_json(c: &CheckBlock) -> Value {
    let mut o = obj();
    o.insert("allocated".into(), c.allocated.into());
    o.insert("grand_total".into(), c.grand_total.into());
    o.insert("reconciled".into(), Value::Bool(c.reconciled));
    o.insert("status".into(), Value::String(if c.degenerate { "degenerate" } else { "ok" }.into()));
    Value::Object(o)
}

#[inline]
fn obj() -> JsonMap<String, Value> {
    JsonMap::new()
}
