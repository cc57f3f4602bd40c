// crates/rp_cli/src/main.rs
//
// Exit codes, typed error mapping, and the run path
// (params → overrides → schedule → pipeline → report → optional files).

mod args;
mod logging;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
    pub const UNREACHABLE: i32 = 5;
}

use std::path::Path;
use std::process::ExitCode;

use chrono::Local;
use tracing::{debug, info};

use args::{parse_and_validate as parse_cli, Args};
use rp_core::{Params, StaticSchedule};
use rp_io::{canonical_json, loader};
use rp_pipeline::{apply_overrides, run_plan, validate_tally, PipelineError, PlanDoc};
use rp_report::{build_model, ReportError, ReportModel};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Bad counts, out-of-domain knobs, malformed parameter/schedule JSON
    Validation(String),
    /// I/O errors (read/write/path/limits)
    Io(String),
    /// The milestone cannot be cleared from this tally
    Unreachable(String),
    /// Rendering errors (report build or output)
    Render(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "invalid input: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Unreachable(m) => write!(f, "{m}"),
            MainError::Render(m) => write!(f, "render: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("rp: error: {e}");
            return ExitCode::from(exitcodes::IO as u8);
        }
    };

    logging::init_tracing(args.verbose, args.quiet);

    let rc = match run_once(&args) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("rp: error: {e}");
            map_error(&e)
        }
    };

    ExitCode::from(rc as u8)
}

fn run_once(args: &Args) -> Result<(), MainError> {
    // 1) Parameters: file (if any) under flags
    let base = match &args.params {
        Some(p) => loader::load_params(p).map_err(map_rpio_err)?,
        None => Params::default(),
    };
    let tally = validate_tally(args.total, args.positive).map_err(map_pipeline_err)?;
    let params = apply_overrides(base, &args.overrides()).map_err(map_pipeline_err)?;
    debug!(?params, "effective parameters");

    // 2) Capacity: schedule file default unless --default-workers is given
    let mut schedule = match &args.schedule {
        Some(p) => loader::load_schedule(p).map_err(map_rpio_err)?,
        None => StaticSchedule::new(params.default_workers).map_err(map_core_err)?,
    };
    if let Some(n) = args.default_workers {
        schedule.set_default_workers(n).map_err(map_core_err)?;
    }

    // 3) Run pipeline
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let plan = run_plan(&tally, &params, &schedule, today).map_err(map_pipeline_err)?;

    // 4) Report (read-only; offline)
    let model = build_model(&plan).map_err(map_report_err)?;
    let text = text_report(&model)?;
    if !args.quiet {
        print!("{text}");
    }

    // 5) Optional files
    for fmt in &args.render {
        match fmt.as_str() {
            "json" => {
                write_plan_json(&plan, &args.out)?;
                write_report_json(&model, &args.out)?;
            }
            "text" => write_plan_text(&text, &args.out)?,
            other => return Err(MainError::Render(format!("unknown renderer: {other}"))),
        }
    }
    if !args.render.is_empty() {
        info!(out = %args.out.display(), "artifacts written");
    }
    Ok(())
}

fn write_plan_json(plan: &PlanDoc, out_dir: &Path) -> Result<(), MainError> {
    let path = out_dir.join("plan.json");
    canonical_json::write_canonical_file(&path, plan)
        .map_err(|e| MainError::Io(format!("write plan.json: {e}")))
}

// Reading-order report next to the canonical plan; gated like the renderer.
fn write_report_json(model: &ReportModel, out_dir: &Path) -> Result<(), MainError> {
    #[cfg(feature = "report-json")]
    {
        let value = rp_report::render_json(model);
        let mut bytes = serde_json::to_vec_pretty(&value)
            .map_err(|e| MainError::Render(format!("report.json: {e}")))?;
        bytes.push(b'\n');
        canonical_json::write_atomic(&out_dir.join("report.json"), &bytes)
            .map_err(|e| MainError::Io(format!("write report.json: {e}")))
    }
    #[cfg(not(feature = "report-json"))]
    {
        let _ = (model, out_dir);
        Err(MainError::Render("json renderer not enabled (build with feature `report-json`)".into()))
    }
}

fn write_plan_text(text: &str, out_dir: &Path) -> Result<(), MainError> {
    let path = out_dir.join("plan.txt");
    canonical_json::write_atomic(&path, text.as_bytes())
        .map_err(|e| MainError::Io(format!("write plan.txt: {e}")))
}

// Always accept the concrete model type; gate body by feature.
fn text_report(model: &ReportModel) -> Result<String, MainError> {
    #[cfg(feature = "report-text")]
    {
        Ok(rp_report::render_text(model))
    }
    #[cfg(not(feature = "report-text"))]
    {
        let _ = model;
        Err(MainError::Render("text renderer not enabled (build with feature `report-text`)".into()))
    }
}

/// Map our typed errors to the exit-code table.
fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Io(_) => IO,
        MainError::Unreachable(_) => UNREACHABLE,
        MainError::Render(_) => IO,
    }
}

fn map_core_err(e: rp_core::CoreError) -> MainError {
    MainError::Validation(e.to_string())
}

/// Translate rp_io::IoError into MainError buckets for exit-code mapping.
fn map_rpio_err(e: rp_io::IoError) -> MainError {
    use rp_io::IoError::*;
    match e {
        // Validation-ish (shape/domain)
        Json { pointer, msg } => MainError::Validation(format!("json {pointer}: {msg}")),
        Invalid(m) => MainError::Validation(m),

        // I/O-ish
        Path(m) => MainError::Io(format!("path: {m}")),
        Limit(m) => MainError::Io(format!("limit: {m}")),
        Hash(m) => MainError::Io(format!("hash: {m}")),
    }
}

/// Translate rp_pipeline::PipelineError into MainError buckets.
fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::InvalidInput(m) => MainError::Validation(m),
        e @ PipelineError::Unreachable { .. } => MainError::Unreachable(e.to_string()),
        PipelineError::Allocate(a) => MainError::Validation(a.to_string()),
        PipelineError::Io(m) | PipelineError::Build(m) => MainError::Io(m),
    }
}

fn map_report_err(e: ReportError) -> MainError {
    MainError::Render(e.to_string())
}
