use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::config::{DEFAULT_SERVER, DEFAULT_TIMEOUT_SECS};

/// Weekly task board synced to a week-keyed backend.
#[derive(Parser)]
#[command(name = "wb", version, about = "Weekly task board")]
pub struct Cli {
    /// Base URL of the task backend.
    #[arg(long, global = true, default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Keep everything in memory for this session instead of using the backend.
    #[arg(long, global = true)]
    pub offline: bool,

    /// Where to write logs (default: weekboard.log in the temp dir).
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
