//! Plain text renderer: summary block, one line per day, then the sum check.
//! No color, no terminal control sequences.

use std::fmt::Write as _;

use crate::iso;
use crate::structure::{DayLine, ReportModel};

const RULE_WIDTH: usize = 70;

pub fn render_text(m: &ReportModel) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let s = &m.summary;
    let mut out = String::new();

    // `write!` into a String cannot fail.
    let _ = writeln!(out, "{heavy}");
    let _ = writeln!(out, "RATING TARGET PLAN");
    let _ = writeln!(out, "{heavy}");
    let _ = writeln!(out, "Current: {}%  ({}/{})", s.current_percent, s.positive, s.total);
    match s.substituted_from {
        Some(from) => {
            let _ = writeln!(out, "Target: > {}%  ({}% unreachable with negatives on record)", s.target, from);
        }
        None => {
            let _ = writeln!(out, "Target: > {}%", s.target);
        }
    }
    let _ = writeln!(out, "Positive needed (min): {}", s.needed_positive);
    let _ = writeln!(out, "Negative buffer: {} ({})", s.risk, s.buffer_strategy);
    let _ = writeln!(out, "Ratings to collect (buffered): {}", s.events_needed);
    if s.padding_total > 0 {
        let _ = writeln!(out, "Per-worker padding: +{}", s.padding_total);
        let _ = writeln!(out, "Grand total: {}", s.grand_total);
    }
    let _ = writeln!(out, "{light}");
    let _ = writeln!(out, "PLAN BY DAY ({} .. {})", iso(m.header.today), iso(m.header.window_end));
    let _ = writeln!(out, "{light}");
    for d in &m.days {
        let _ = writeln!(out, "{}", day_line(d));
    }
    let _ = writeln!(out, "{light}");
    let _ = writeln!(out, "Sum check: allocated {} of {}", m.check.allocated, m.check.grand_total);
    if m.check.degenerate {
        let _ = writeln!(out, "Status: degenerate (no worker capacity in window)");
    }
    let _ = writeln!(out, "Plan id: {}", m.header.plan_id);
    out
}

fn day_line(d: &DayLine) -> String {
    let mark = if d.is_today { " (today)" } else { "" };
    let mut line = format!(
        "{}{mark}: workers {} | total {} | per worker {}",
        iso(d.date),
        d.workers,
        d.total,
        d.max_per_worker
    );
    // Uneven splits list every share so the sum is visible.
    if d.per_worker.iter().any(|&p| p != d.max_per_worker) {
        let parts: Vec<String> = d.per_worker.iter().map(u64::to_string).collect();
        let _ = write!(line, " [{}]", parts.join("/"));
    }
    line
}
