mod terminal;

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use mapty_core::{
    Deletion, DirStore, LedgerConfig, Outcome, SortOrder, WorkoutForm, WorkoutId, WorkoutSession,
};
use mapty_protocol::Coords;
use tracing_subscriber::EnvFilter;

use crate::terminal::TerminalMap;

#[derive(Parser, Debug)]
#[command(
    name = "mapty",
    version,
    about = "Log runs and rides at map locations",
    after_help = "Logging is controlled by MAPTY_LOG (default: warn)."
)]
struct Cli {
    /// Directory holding the stored ledger
    #[arg(long, global = true, env = "MAPTY_DATA", default_value = ".mapty", value_hint = ValueHint::DirPath)]
    data: PathBuf,

    /// JSON ledger configuration (storageKey, bulkDeleteIntervalMs)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the workout list
    List {
        /// Order by distance instead of creation
        #[arg(long, value_enum, default_value_t = SortOpt::Created)]
        sort: SortOpt,
    },
    /// Log a workout at a location
    Add(AddArgs),
    /// Replace the values of an existing workout
    Edit(EditArgs),
    /// Delete one workout
    Delete {
        id: String,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Delete every workout
    Clear {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct AddArgs {
    /// run or ride
    kind: String,
    /// Location as <lat>,<lng>
    #[arg(value_parser = parse_coords, allow_hyphen_values = true)]
    coords: Coords,
    #[command(flatten)]
    values: FormValues,
}

#[derive(Args, Debug)]
struct EditArgs {
    id: String,
    /// run or ride
    kind: String,
    #[command(flatten)]
    values: FormValues,
}

/// Raw form fields; the core validates them.
#[derive(Args, Debug)]
struct FormValues {
    #[arg(value_name = "DISTANCE_KM", allow_hyphen_values = true)]
    distance: String,
    #[arg(value_name = "DURATION_MIN", allow_hyphen_values = true)]
    duration: String,
    /// Cadence (spm) for a run, elevation gain (m) for a ride
    #[arg(value_name = "CADENCE_OR_ELEVATION", allow_hyphen_values = true)]
    cadence_or_elevation: String,
}

impl FormValues {
    fn into_form(self, kind: String) -> WorkoutForm {
        WorkoutForm::new(kind, self.distance, self.duration, self.cadence_or_elevation)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SortOpt {
    Created,
    Asc,
    Desc,
}

impl From<SortOpt> for SortOrder {
    fn from(value: SortOpt) -> Self {
        match value {
            SortOpt::Created => SortOrder::Unsorted,
            SortOpt::Asc => SortOrder::Ascending,
            SortOpt::Desc => SortOrder::Descending,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_env("MAPTY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    run(cli)
}

fn parse_coords(raw: &str) -> Result<Coords, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| "coordinates must look like <lat>,<lng>".to_string())?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("latitude is not a number: {e}"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|e| format!("longitude is not a number: {e}"))?;
    Ok(Coords::new(lat, lng))
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            LedgerConfig::from_json(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => LedgerConfig::default(),
    };
    let store = DirStore::open(&cli.data)
        .with_context(|| format!("opening data directory {}", cli.data.display()))?;
    let mut session = WorkoutSession::boot(config, TerminalMap::default(), store);
    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::List { sort } => {
            let sort = SortOrder::from(sort);
            while session.sort_order() != sort {
                session.toggle_sort();
            }
            terminal::print_rows(&session.rows())?;
        }
        Command::Add(AddArgs {
            kind,
            coords,
            values,
        }) => {
            session.select_location(coords);
            let outcome = session.submit(&values.into_form(kind))?;
            let id = report(outcome);
            writeln!(out, "added {id}")?;
        }
        Command::Edit(EditArgs { id, kind, values }) => {
            let id = WorkoutId::new(id);
            let outcome = session.edit(&id, &values.into_form(kind))?;
            report(outcome);
            writeln!(out, "updated {id}")?;
        }
        Command::Delete { id, yes } => {
            let id = WorkoutId::new(id);
            let pending = session.request_delete(&id)?;
            answer(&mut session, yes)?;
            match session.finish_deletion(pollster::block_on(pending))? {
                Deletion::Removed(outcome) => {
                    let removed = report(outcome);
                    writeln!(out, "deleted {}", removed.id())?;
                }
                _ => writeln!(out, "kept {id}")?,
            }
        }
        Command::Clear { yes } => {
            let pending = session.request_delete_all()?;
            answer(&mut session, yes)?;
            match session.finish_deletion(pollster::block_on(pending))? {
                Deletion::Declined => writeln!(out, "kept all workouts")?,
                Deletion::RemovedAll(outcome) => {
                    let removed = report(outcome);
                    writeln!(out, "deleted {} workouts", removed.len())?;
                }
                Deletion::BulkStarted { .. } => loop {
                    if let Some(outcome) = session.tick_bulk_delete(Instant::now())? {
                        let removed = report(outcome);
                        writeln!(out, "deleted {} ({})", removed.id(), removed.description())?;
                    }
                    match session.bulk_delete_due() {
                        Some(due) => std::thread::sleep(due.saturating_duration_since(Instant::now())),
                        None => break,
                    }
                },
                Deletion::Removed(_) => {}
            }
        }
    }
    Ok(())
}

/// Answer the open confirmation, asking on the terminal unless `--yes`.
fn answer(session: &mut WorkoutSession<TerminalMap, DirStore>, yes: bool) -> Result<()> {
    let confirmed = if yes {
        true
    } else {
        let question = session
            .confirmations()
            .pending_message()
            .unwrap_or("Continue?")
            .to_string();
        terminal::ask(&question)?
    };
    session.confirmations().answer(confirmed)?;
    Ok(())
}

/// Unwrap an outcome, surfacing a failed write on stderr.
fn report<T>(outcome: Outcome<T>) -> T {
    if let Some(warning) = &outcome.warning {
        eprintln!("warning: change not saved: {warning}");
    }
    outcome.into_value()
}
