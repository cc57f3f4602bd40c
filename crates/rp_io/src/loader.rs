//! Loader: read local JSON inputs (worker schedule, parameter set) into the
//! typed values the pipeline consumes. No network I/O.
//!
//! Schedule file shape:
//! ```json
//! { "default_workers": 5, "days": { "2026-01-15": 5, "2026-01-16": null } }
//! ```
//! A `null` day falls back to `default_workers`, same as an absent one.

#![forbid(unsafe_code)]

use std::{collections::BTreeMap, fs::File, io::Read, path::Path};

use chrono::NaiveDate;
use rp_core::{variables::DEFAULT_WORKERS, Params, StaticSchedule};
use serde::Deserialize;
use serde_json::Value;

use crate::IoError;

/// Input files beyond this size are rejected before parsing.
pub const MAX_INPUT_BYTES: u64 = 1 << 20;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ----------------------------- Wire types -----------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScheduleFile {
    #[serde(default)]
    default_workers: Option<u32>,
    #[serde(default)]
    days: BTreeMap<String, Option<u32>>,
}

// ----------------------------- Targeted loaders -----------------------------

pub fn load_schedule(path: &Path) -> Result<StaticSchedule, IoError> {
    let v = read_json_value_with_limits(path)?;
    schedule_from_value(v)
}

pub fn load_params(path: &Path) -> Result<Params, IoError> {
    let v = read_json_value_with_limits(path)?;
    params_from_value(v)
}

/// Parse a schedule document already in memory.
pub fn schedule_from_value(v: Value) -> Result<StaticSchedule, IoError> {
    let file: ScheduleFile = serde_json::from_value(v)
        .map_err(|e| IoError::Json { pointer: "/".into(), msg: e.to_string() })?;

    let default_workers = file.default_workers.unwrap_or(DEFAULT_WORKERS);
    let mut schedule = StaticSchedule::new(default_workers)
        .map_err(|e| IoError::Json { pointer: "/default_workers".into(), msg: e.to_string() })?;
    for (key, workers) in file.days {
        let date = NaiveDate::parse_from_str(&key, DATE_FORMAT).map_err(|_| IoError::Json {
            pointer: format!("/days/{key}"),
            msg: "expected a YYYY-MM-DD date key".into(),
        })?;
        if let Some(n) = workers {
            schedule = schedule
                .with_day(date, n)
                .map_err(|e| IoError::Json { pointer: format!("/days/{key}"), msg: e.to_string() })?;
        }
    }
    Ok(schedule)
}

/// Parse a parameter document already in memory. Domain checks (risk range,
/// milestone order) run inside the `rp_core` deserializers.
pub fn params_from_value(v: Value) -> Result<Params, IoError> {
    serde_json::from_value(v).map_err(|e| IoError::Invalid(format!("params: {e}")))
}

// ----------------------------- Helpers -----------------------------

fn read_json_value_with_limits(path: &Path) -> Result<Value, IoError> {
    let f = File::open(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    let len = f.metadata()?.len();
    if len > MAX_INPUT_BYTES {
        return Err(IoError::Limit(format!(
            "{} is {len} bytes (max {MAX_INPUT_BYTES})",
            path.display()
        )));
    }
    let mut buf = String::with_capacity(len as usize);
    f.take(MAX_INPUT_BYTES).read_to_string(&mut buf)?;
    Ok(serde_json::from_str(&buf)?)
}
