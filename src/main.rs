/// Command-line entry point for the habit tracker
///
/// Sets up logging, resolves the database path and runs one subcommand.
/// Results are printed to stdout as JSON; logs go to stderr.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

use habit_tracker::tools::{
    self, DayMark, LifecycleAction, ListParams, LogDayParams, ProgressMode, ProgressParams,
    StatusParams,
};
use habit_tracker::{HabitStatus, HabitTracker, TrackerError};

/// Get the default database path with robust fallback strategy
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let potential_paths = [
        // 1. User's home directory (preferred)
        dirs::home_dir().map(|mut p| {
            p.push(".habit_tracker");
            p
        }),
        // 2. User's data directory (platform-specific)
        dirs::data_dir().map(|mut p| {
            p.push("habit_tracker");
            p
        }),
        // 3. User's config directory
        dirs::config_dir().map(|mut p| {
            p.push("habit_tracker");
            p
        }),
        // 4. Current working directory (last resort)
        std::env::current_dir().ok().map(|mut p| {
            p.push(".habit_tracker");
            p
        }),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_ok() {
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                return Ok(potential_path.join("habits.db"));
            }
        }
    }

    let mut temp_path = std::env::temp_dir();
    temp_path.push("habit_tracker");
    std::fs::create_dir_all(&temp_path)?;
    temp_path.push("habits.db");

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path)
}

/// Command line arguments for the habit tracker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, env = "HABIT_TRACKER_DB", global = true)]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a habit from a JSON payload
    Create {
        /// File holding the payload, or `-` for stdin
        #[arg(long, default_value = "-")]
        payload: String,
    },
    /// List habits, optionally filtered by lifecycle status
    List {
        #[arg(long)]
        status: Option<HabitStatus>,
    },
    /// Show a habit's state on one day
    Show {
        habit_id: String,
        /// YYYY-MM-DD or RFC 3339 timestamp; defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Mark a day as completed, missed or skipped
    Mark {
        habit_id: String,
        mark: DayMark,
        #[arg(long)]
        date: Option<String>,
    },
    /// Set or add progress on a measured habit
    Progress {
        habit_id: String,
        mode: ProgressMode,
        #[arg(allow_negative_numbers = true)]
        value: f64,
        #[arg(long)]
        date: Option<String>,
    },
    /// Change a habit's lifecycle status
    Lifecycle {
        habit_id: String,
        action: LifecycleAction,
    },
    /// Rename a habit
    Rename { habit_id: String, name: String },
    /// Delete a habit and its history
    Delete { habit_id: String },
}

fn read_payload(source: &str) -> Result<serde_json::Value, TrackerError> {
    let mut raw = String::new();
    if source == "-" {
        std::io::stdin().read_to_string(&mut raw)?;
    } else {
        raw = std::fs::read_to_string(source)?;
    }
    Ok(serde_json::from_str(&raw)?)
}

fn print_json<T: Serialize>(response: &T) -> Result<(), TrackerError> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}

fn run(tracker: &HabitTracker, command: Command) -> Result<(), TrackerError> {
    let storage = tracker.storage();

    match command {
        Command::Create { payload } => {
            let payload = read_payload(&payload)?;
            print_json(&tools::create_habit(storage, &payload)?)
        }
        Command::List { status } => {
            print_json(&tools::list_habits(storage, ListParams { status })?)
        }
        Command::Show { habit_id, date } => {
            print_json(&tools::habit_status(storage, StatusParams { habit_id, date })?)
        }
        Command::Mark { habit_id, mark, date } => print_json(&tools::log_day(
            storage,
            LogDayParams { habit_id, mark, date },
        )?),
        Command::Progress {
            habit_id,
            mode,
            value,
            date,
        } => print_json(&tools::record_progress(
            storage,
            ProgressParams {
                habit_id,
                mode,
                value,
                date,
            },
        )?),
        Command::Lifecycle { habit_id, action } => {
            print_json(&tools::change_lifecycle(storage, &habit_id, action)?)
        }
        Command::Rename { habit_id, name } => {
            print_json(&tools::rename_habit(storage, &habit_id, &name)?)
        }
        Command::Delete { habit_id } => print_json(&tools::delete_habit(storage, &habit_id)?),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_tracker={}", log_level))
        .with_writer(std::io::stderr) // Send logs to stderr, not stdout
        .init();

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let tracker = HabitTracker::open(db_path)?;
    run(&tracker, args.command)?;

    Ok(())
}
