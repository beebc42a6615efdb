//! `crontime` CLI: query cron-style availability schedules from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Is the schedule open right now?
//! crontime --rules rules.json open-at now
//!
//! # Open seconds between two instants
//! crontime --rules rules.json duration "mon 9:00" "fri 17:00"
//!
//! # When will 3 open hours have elapsed, starting from a pinned "now"?
//! crontime --rules rules.json --now "2020-06-29 12:00" future 10800
//!
//! # The next 5 days with open time (rules from stdin)
//! echo '[{"raw":"* 9-16 * * mon-fri"}]' | crontime days 5 tomorrow
//! ```
//!
//! Set `RUST_LOG=crontime=debug` for diagnostics on stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crontime::{InstantParser, Schedule, SearchLimits};
use serde_json::json;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

const INSTANT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Parser)]
#[command(
    name = "crontime",
    version,
    about = "Query open/closed availability defined by cron-style rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with the rule list (reads from stdin if omitted)
    #[arg(short, long, global = true)]
    rules: Option<String>,

    /// Reference instant used for "now", weekday names and bare times
    #[arg(long, global = true)]
    now: Option<String>,

    /// JSON file overriding the forward-search limits
    #[arg(long, global = true)]
    limits: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether an instant falls inside an open window
    OpenAt {
        /// Instant to check
        instant: String,
    },
    /// Count open seconds between two instants
    Duration {
        /// Start instant
        from: String,
        /// End instant
        #[arg(default_value = "now")]
        to: String,
    },
    /// Find the instant at which a number of open seconds will have elapsed
    Future {
        /// Open seconds to accumulate
        seconds: u64,
        /// Start instant
        #[arg(default_value = "now")]
        from: String,
    },
    /// List the next days with any open time and their windows
    Days {
        /// Number of open days to list
        count: usize,
        /// Start instant (only its date is used)
        #[arg(default_value = "now")]
        from: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crontime=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let schedule = load_schedule(&cli)?;

    let output = match cli.command {
        Commands::OpenAt { instant } => {
            let open = schedule
                .is_open_at(&instant)
                .with_context(|| format!("Failed to check instant: {}", instant))?;
            json!({ "open": open })
        }
        Commands::Duration { from, to } => {
            let seconds = schedule
                .open_duration(&from, &to)
                .context("Failed to compute open duration")?;
            json!({ "seconds": seconds })
        }
        Commands::Future { seconds, from } => {
            let instant = schedule
                .future_open_instant(seconds, &from)
                .context("Failed to compute future open instant")?;
            json!({ "instant": instant.map(|at| at.format(INSTANT_FORMAT).to_string()) })
        }
        Commands::Days { count, from } => {
            let days = schedule
                .next_open_days(count, &from)
                .context("Failed to list open days")?;
            serde_json::to_value(days)?
        }
    };

    println!("{}", output);
    Ok(())
}

/// Build the schedule from `--rules` (or stdin), `--now` and `--limits`.
fn load_schedule(cli: &Cli) -> Result<Schedule> {
    let rules = read_input(cli.rules.as_deref())?;
    let mut schedule = Schedule::from_json(&rules).context("Failed to parse rules")?;

    if let Some(now) = cli.now.as_deref() {
        let reference = InstantParser::local()
            .parse(now)
            .with_context(|| format!("Invalid --now value: {}", now))?;
        tracing::debug!(%reference, "pinned reference instant");
        schedule = schedule.with_reference(reference);
    }

    if let Some(path) = cli.limits.as_deref() {
        let json = read_input(Some(path))?;
        let limits = SearchLimits::from_json(&json).context("Failed to parse search limits")?;
        schedule = schedule.with_limits(limits)?;
    }

    Ok(schedule)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
