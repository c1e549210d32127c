//! CLI parser.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "teams-bot")]
#[command(about = "Teams activity CLI: classify and replay recorded activities", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print how each activity would be routed (kind, team event type, invoke handler) as JSON lines.
    Classify {
        /// JSON file with one activity or an array of activities.
        file: PathBuf,
    },
    /// Run activities through the configured chain with logging handlers; print outgoing activities as JSON lines.
    Replay {
        /// JSON file with one activity or an array of activities.
        file: PathBuf,
        /// Overrides LOG_FILE.
        #[arg(long)]
        log_file: Option<String>,
    },
}
