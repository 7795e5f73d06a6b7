//! Enumerations for TUI state management.

/// Which screen the board is showing.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppState {
    Board,
    Help,
    ConfirmClear,
}

/// Whether keystrokes go to the focused card's text input.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum InputMode {
    None,
    Text,
}

/// Selected day column (1-based) and card within it.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Focus {
    pub day: usize,
    pub card: usize,
}

impl Focus {
    pub fn new(day: usize) -> Self {
        Focus { day, card: 0 }
    }
}
