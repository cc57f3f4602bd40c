// crates/rp_cli/src/args.rs
//
// Flag surface for `rp`. Counts are parsed signed so a negative value reaches
// the domain check (exit 2) instead of a generic parse failure. Input files
// must exist before anything runs (exit 4).

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use clap::{ArgAction, Parser};
use rp_core::variables::BufferStrategy;
use rp_pipeline::Overrides;

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "rp",
    disable_help_subcommand = true,
    about = "Plan how many ratings to collect, per day and per worker, to clear the next milestone"
)]
pub struct Args {
    // --- Tally ---
    /// Ratings received so far.
    #[arg(long, allow_negative_numbers = true)]
    pub total: i64,
    /// How many of them were positive.
    #[arg(long, allow_negative_numbers = true)]
    pub positive: i64,

    // --- Planning knobs (override --params) ---
    /// Expected negative share of new ratings, in [0, 1).
    #[arg(long, allow_negative_numbers = true)]
    pub risk: Option<f64>,
    /// Extra ratings per worker per day, added after the day split.
    #[arg(long = "extra-per-worker", allow_negative_numbers = true)]
    pub extra_per_worker: Option<i64>,
    /// Risk buffering strategy.
    #[arg(long, value_parser = parse_strategy)]
    pub buffer: Option<BufferStrategy>,
    /// Comma-separated ascending milestones, e.g. 90,93,95.
    #[arg(long, value_parser = parse_milestones)]
    pub milestones: Option<MilestoneList>,
    /// When 100% is out of reach, plan for the highest milestone below it.
    #[arg(long)]
    pub fallback_milestone: bool,

    // --- Inputs ---
    /// Worker schedule JSON path.
    #[arg(long)]
    pub schedule: Option<PathBuf>,
    /// Headcount for dates the schedule does not list.
    #[arg(long)]
    pub default_workers: Option<u32>,
    /// Parameter set JSON path.
    #[arg(long)]
    pub params: Option<PathBuf>,
    /// Plan as of this date (default: local today).
    #[arg(long, value_parser = parse_date)]
    pub today: Option<NaiveDate>,

    // --- Output & rendering ---
    /// Output directory for rendered files (default: current directory).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
    /// File(s) to write: json → plan.json + report.json, text → plan.txt. Repeatable.
    #[arg(long, value_parser = ["json", "text"])]
    pub render: Vec<String>,

    // --- Control ---
    /// Suppress the report on stdout and all logs below error.
    #[arg(long)]
    pub quiet: bool,
    /// More log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// `--milestones` value; a newtype so clap treats it as one argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneList(pub Vec<u8>);

impl Args {
    /// Flag values that take precedence over the parameter file.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            risk: self.risk,
            extra_per_worker_per_day: self.extra_per_worker,
            buffer_strategy: self.buffer,
            milestones: self.milestones.as_ref().map(|m| m.0.clone()),
            default_workers: self.default_workers,
            fallback_milestone: self.fallback_milestone,
        }
    }
}

/// An input file named on the command line is missing.
#[derive(Debug)]
pub struct CliError {
    flag: &'static str,
    path: PathBuf,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "file not found: {} {}", self.flag, self.path.display())
    }
}
impl std::error::Error for CliError {}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

/// Fail early on input files that are not there.
pub fn validate(args: Args) -> Result<Args, CliError> {
    if let Some(p) = &args.params {
        require_file(p, "--params")?;
    }
    if let Some(p) = &args.schedule {
        require_file(p, "--schedule")?;
    }
    Ok(args)
}

pub fn parse_strategy(s: &str) -> Result<BufferStrategy, String> {
    s.trim().parse::<BufferStrategy>().map_err(|_| "expected `expected` or `strict`".into())
}

pub fn parse_milestones(s: &str) -> Result<MilestoneList, String> {
    s.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<u8>().map_err(|_| format!("milestone `{part}` is not an integer in 0..=255"))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(MilestoneList)
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| "expected YYYY-MM-DD".into())
}

fn require_file(p: &Path, flag: &'static str) -> Result<(), CliError> {
    match fs::metadata(p) {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(CliError { flag, path: p.to_path_buf() }),
    }
}
