use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// opswatch: operations watchdog for a small production stack
///
/// Sends a daily briefing on site, database, error tracker, deployment and
/// inbox health, and alerts quickly when the site or deployment goes down.
#[derive(Parser, Debug)]
#[command(name = "opswatch")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Subcommand to execute (defaults to the daemon)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to custom config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scheduler: quick outage checks plus the daily briefing
    #[command(alias = "d")]
    Daemon {
        /// Send a briefing immediately instead of waiting for the daily slot
        #[arg(long)]
        briefing_on_start: bool,
    },

    /// Run every check once and deliver the briefing
    #[command(alias = "b")]
    Briefing {
        /// Print the report as JSON instead of delivering it
        #[arg(long)]
        json: bool,

        /// Print the briefing to the terminal instead of posting it
        #[arg(long)]
        dry_run: bool,
    },

    /// Run the quick outage check once
    #[command(alias = "c")]
    Check,
}
