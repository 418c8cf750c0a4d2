use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use roster_core::{Roster, RosterConfig, ScheduleCache};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod formatter;
mod interactive;

use formatter::Report;
use interactive::Session;

/// Directories searched for a roster when no file is given
const SEARCH_DIRS: &[&str] = &[".", "data"];

#[derive(Parser)]
#[command(name = "rosterview")]
#[command(about = "Look up shift assignments in a roster spreadsheet", long_about = None)]
#[command(version)]
struct Cli {
    /// Roster spreadsheet (xlsx, xls, xlsb, ods). Defaults to the newest .xlsx in ./ or data/
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Person code to look up (defaults to the first person in the roster)
    #[arg(short, long, value_name = "CODE")]
    person: Option<String>,

    /// Date to look up (defaults to today, or the first scheduled date)
    #[arg(short, long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,

    /// Also show the Monday-Sunday table for the selected week
    #[arg(short, long)]
    week: bool,

    /// Prompt for lookups until `quit`, re-reading the file each time
    #[arg(short, long, conflicts_with_all = ["date", "week"])]
    interactive: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Show debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output for scripts
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = load_config(cli.config.as_deref())?;
    config.validate().context("Invalid configuration")?;

    let Some(path) = cli.file.clone().or_else(|| discover_roster(SEARCH_DIRS)) else {
        eprintln!(
            "No roster file found in {}. Pass a roster spreadsheet: rosterview <FILE>",
            SEARCH_DIRS.join(" or ")
        );
        std::process::exit(2);
    };
    debug!(path = %path.display(), "using roster file");

    let mut cache = ScheduleCache::new();

    if cli.interactive {
        let session = Session::open(&path, config, &mut cache, cli.person.as_deref(), cli.format)?;
        return interactive::run(io::stdin().lock(), &mut io::stdout().lock(), session);
    }

    let schedule = cache
        .load_file(&path, &config)
        .with_context(|| format!("Could not read the roster file: {}", path.display()))?;
    let roster = Roster::new(config, schedule);

    let person = select_person(&roster, cli.person.as_deref())?;
    let date = select_date(&roster, cli.date)?;
    let report = Report::build(&roster, &person, date, cli.week, &source_name(&path));

    formatter::write_report(&mut io::stdout().lock(), &report, cli.format)
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<RosterConfig> {
    if let Some(config_path) = explicit {
        return RosterConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()));
    }

    // Try to load default config from current directory if it exists
    let default_config_path = PathBuf::from("rosterview.toml");
    if default_config_path.exists() {
        RosterConfig::from_file(&default_config_path).with_context(|| {
            format!(
                "Failed to load config from {}",
                default_config_path.display()
            )
        })
    } else {
        Ok(RosterConfig::default())
    }
}

/// Newest `.xlsx` across `dirs`, ignoring Office lock files
fn discover_roster<P: AsRef<Path>>(dirs: &[P]) -> Option<PathBuf> {
    dirs.iter()
        .filter_map(|dir| fs::read_dir(dir).ok())
        .flatten()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_roster_candidate(path))
        .filter_map(|path| {
            let modified = fs::metadata(&path).ok()?.modified().ok()?;
            Some((modified, path))
        })
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, path)| path)
}

fn is_roster_candidate(path: &Path) -> bool {
    let is_xlsx = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);
    let is_lock_file = path
        .file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.starts_with("~$"))
        .unwrap_or(false);
    is_xlsx && !is_lock_file && path.is_file()
}

pub(crate) fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub(crate) fn select_person(roster: &Roster, requested: Option<&str>) -> Result<String> {
    let config = roster.config();
    match requested {
        Some(code) if config.is_known_person(code) => Ok(code.to_string()),
        Some(code) => anyhow::bail!(
            "Unknown person '{}'. Known people: {}",
            code,
            config.people.join(", ")
        ),
        None => config
            .people
            .first()
            .cloned()
            .context("The roster configuration lists no people"),
    }
}

pub(crate) fn select_date(roster: &Roster, requested: Option<NaiveDate>) -> Result<NaiveDate> {
    let date = match requested {
        Some(date) => {
            let clamped = roster
                .clamp_date(date)
                .context("The schedule has no dated rows")?;
            if clamped != date {
                warn!(
                    requested = %date,
                    using = %clamped,
                    "date is outside the schedule"
                );
            }
            clamped
        }
        None => roster
            .default_date(Local::now().date_naive())
            .context("The schedule has no dated rows")?,
    };
    Ok(date)
}
