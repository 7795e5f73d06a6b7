//! Command implementations for the CLI interface.
//!
//! One-shot commands (`show`, `add`, `clear`, `key`) run against the backend
//! with inline saves; `ui` opens the interactive board with saves issued in
//! the background.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use chrono::{Local, NaiveDate};

use crate::board::{Board, BoardView};
use crate::card::CardEvent;
use crate::config::Config;
use crate::error::{BoardError, Result};
use crate::fields::Status;
use crate::tui::run::run_board_tui;
use crate::week::{self, DAYS_IN_WEEK, DAY_NAMES};

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive week board.
    Ui {
        /// Any date in the week to open: YYYY-MM-DD, "today", "next week", "in 2w".
        #[arg(long)]
        date: Option<String>,
    },

    /// Print a week's tasks.
    Show {
        /// Any date in the week to show.
        #[arg(long)]
        date: Option<String>,
    },

    /// Add a task to a day and save the week.
    Add {
        /// Task text.
        text: String,
        /// Day of the week: 1 (Monday) to 7 (Sunday).
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=7))]
        day: u8,
        /// Status: completed | abandoned | in-process | no-status.
        #[arg(long, value_enum, default_value_t = Status::NoStatus)]
        status: Status,
        /// Any date in the target week.
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a week on the backend.
    Clear {
        /// Any date in the week to clear.
        #[arg(long)]
        date: Option<String>,
    },

    /// Print the week-key (Monday date) for a date.
    Key {
        /// Date to resolve (default today).
        #[arg(long)]
        date: Option<String>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Resolve `--date` into a week-key, relative to `today`.
pub fn resolve_week_key(date: Option<&str>, today: NaiveDate) -> Result<String> {
    let raw = date.unwrap_or("today");
    week::parse_date_input(raw, today)
        .map(week::key_of)
        .ok_or_else(|| BoardError::InvalidWeekKey(raw.to_string()))
}

fn week_key_or_exit(date: Option<&str>) -> String {
    match resolve_week_key(date, Local::now().date_naive()) {
        Ok(key) => key,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Launch the terminal user interface.
pub fn cmd_ui(config: &Config, date: Option<String>) {
    let week_key = week_key_or_exit(date.as_deref());
    let board = Board::new(config.background_sync(), BoardView::full());
    if let Err(e) = run_board_tui(board, &week_key, Local::now().date_naive()) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Format a loaded week as one block per day.
pub fn format_week(board: &Board) -> String {
    let mut out = String::new();
    let Some(monday) = board.monday() else {
        return out;
    };
    out.push_str(&format!("Week of {}\n", week::key_of(monday)));
    for day_index in 0..DAYS_IN_WEEK {
        let date = week::day_date(monday, day_index);
        out.push_str(&format!("{:<4} {}\n", DAY_NAMES[day_index], date.format("%Y-%m-%d")));
        let cards = board
            .view()
            .column(day_index + 1)
            .map(|c| c.cards.as_slice())
            .unwrap_or(&[]);
        for line in cards.iter().filter_map(|c| c.display_line()) {
            out.push_str(&format!("     - {line}\n"));
        }
    }
    out
}

/// Print a week's tasks.
pub fn cmd_show(config: &Config, date: Option<String>) {
    let week_key = week_key_or_exit(date.as_deref());
    let mut board = Board::new(config.inline_sync(), BoardView::full());
    if let Err(e) = board.open_week(&week_key) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
    print!("{}", format_week(&board));
}

/// Commit a new task through the card path: open week, add card, type, pick, save.
pub fn add_task(board: &mut Board, week_key: &str, day: usize, text: &str, status: Status) -> Result<CardEvent> {
    board.open_week(week_key)?;
    let idx = board.add_task(day).ok_or(BoardError::InvalidDay(day))?;
    if let Some(input) = board.card_mut(day, idx).and_then(|c| c.input_mut()) {
        text.chars().for_each(|c| input.handle_char(c));
    }
    if status.is_selectable() {
        board.select_status(day, idx, status);
    }
    board
        .primary_action(day, idx)?
        .ok_or(BoardError::InvalidDay(day))
}

/// Add a task from the command line.
pub fn cmd_add(config: &Config, text: String, day: u8, status: Status, date: Option<String>) {
    let week_key = week_key_or_exit(date.as_deref());
    let mut board = Board::new(config.inline_sync(), BoardView::full());
    match add_task(&mut board, &week_key, day as usize, &text, status) {
        Ok(CardEvent::Committed(task)) => {
            println!(
                "Added to {} of week {}: {} (id {})",
                DAY_NAMES[day as usize - 1],
                week_key,
                task.display_line(),
                task.id
            );
        }
        Ok(CardEvent::EditStarted) => {}
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Delete a week on the backend.
pub fn cmd_clear(config: &Config, date: Option<String>) {
    let week_key = week_key_or_exit(date.as_deref());
    let sync = config.inline_sync();
    match sync.clear(&week_key) {
        Ok(()) => println!("Cleared week {week_key}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Print the week-key for a date.
pub fn cmd_key(date: Option<String>) {
    println!("{}", week_key_or_exit(date.as_deref()));
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{MemoryBackend, SyncClient};
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    #[test]
    fn test_resolve_week_key() {
        assert_eq!(resolve_week_key(None, today()).unwrap(), "2024-06-10");
        assert_eq!(resolve_week_key(Some("next week"), today()).unwrap(), "2024-06-17");
        assert_eq!(resolve_week_key(Some("2024-06-16"), today()).unwrap(), "2024-06-10");
        assert!(resolve_week_key(Some("whenever"), today()).is_err());
    }

    #[test]
    fn test_add_then_show() {
        let backend = Arc::new(MemoryBackend::new());
        let mut board = Board::new(SyncClient::inline(backend.clone()), BoardView::full());
        let event = add_task(&mut board, "2024-06-10", 3, "  Write report ", Status::InProcess).unwrap();
        assert!(matches!(event, CardEvent::Committed(_)));
        add_task(&mut board, "2024-06-10", 3, "Review", Status::NoStatus).unwrap();

        // A fresh board sees what the first one saved.
        let mut fresh = Board::new(SyncClient::inline(backend), BoardView::full());
        fresh.open_week("2024-06-10").unwrap();
        let text = format_week(&fresh);
        assert!(text.starts_with("Week of 2024-06-10\n"));
        assert!(text.contains("Wed  2024-06-12\n     - Write report - In Process\n     - Review - No status\n"));
        assert!(text.contains("Sun  2024-06-16\n"));
    }

    #[test]
    fn test_add_rejects_bad_day() {
        let mut board = Board::new(SyncClient::inline(Arc::new(MemoryBackend::new())), BoardView::full());
        assert!(matches!(
            add_task(&mut board, "2024-06-10", 9, "x", Status::NoStatus),
            Err(BoardError::InvalidDay(9))
        ));
    }
}
