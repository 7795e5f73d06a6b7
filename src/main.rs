//! # WB - Weekly Board
//!
//! A week-at-a-glance task board: seven day-columns, task cards with a
//! tri-state status, and a backend that stores each week under the date of
//! its Monday.
//!
//! ## Key Features
//!
//! - **Week Keys**: every week is addressed by its Monday (`YYYY-MM-DD`);
//!   Sunday counts as the last day of the week.
//! - **Task Cards**: add a card, type, pick Completed / Abandoned / In Process,
//!   save. Saved cards are read-only until you press Edit.
//! - **Whole-Week Sync**: each save sends the full week to the backend, so
//!   re-sending is harmless. Load failures show an empty week; save failures
//!   are logged.
//! - **Terminal Board**: an interactive TUI plus one-shot commands for scripts.
//!
//! ## Quick Start
//!
//! ```bash
//! # Open this week's board
//! wb ui
//!
//! # Add a task to Wednesday
//! wb add "Write report" --day 3 --status in-process
//!
//! # Print next week
//! wb show --date "next week"
//!
//! # Work without a backend
//! wb --offline ui
//! ```
//!
//! ## Backend
//!
//! `GET|POST|DELETE {server}/api/tasks/{week_key}` with a `{"days": {...}}`
//! body. Set the server with `--server` (default `http://127.0.0.1:3000`).
//! Logs go to `weekboard.log` in the temp directory; `RUST_LOG` sets the level.

use clap::Parser;

pub mod board;
pub mod card;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod fields;
pub mod input;
pub mod logging;
pub mod store;
pub mod sync;
pub mod task;
pub mod week;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod run;
}

use cli::Cli;
use cmd::*;
use config::Config;

fn main() {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    if let Err(e) = logging::init(&config.log_file) {
        eprintln!("Failed to open log file {}: {}", config.log_file.display(), e);
    }

    match cli.command {
        Commands::Ui { date } => cmd_ui(&config, date),
        Commands::Show { date } => cmd_show(&config, date),
        Commands::Add { text, day, status, date } => cmd_add(&config, text, day, status, date),
        Commands::Clear { date } => cmd_clear(&config, date),
        Commands::Key { date } => cmd_key(date),
        Commands::Completions { shell } => cmd_completions(shell),
    }
}
