//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Plain-text time log viewer.
///
/// Reads weekly log files of `HH:MM → HH:MM task` lines and prints the tasks
/// of a date span with their durations and summary statistics.
#[derive(Debug, Parser)]
#[command(name = "tl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the tasks logged between two dates.
    Show {
        /// First date (YYYY-MM-DD or "now"). Defaults to the start of this week.
        #[arg(long)]
        from: Option<String>,

        /// Last date (YYYY-MM-DD or "now"). Defaults to today.
        #[arg(long)]
        to: Option<String>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Parse a log file, or stdin, and show its tasks.
    Parse {
        /// Log file to read. Reads stdin when omitted.
        file: Option<PathBuf>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Print the week file holding a date.
    Week {
        /// Date (YYYY-MM-DD or "now").
        #[arg(default_value = "now")]
        date: String,
    },
}

/// Options shared by the commands printing tasks.
#[derive(Debug, Clone, Default, Args)]
pub struct ViewArgs {
    /// Only keep lines matching this case-insensitive regular expression.
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Collapse tasks with identical text into one entry.
    #[arg(short, long)]
    pub merge: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}
