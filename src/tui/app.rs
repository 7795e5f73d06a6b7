//! Week board terminal interface.
//!
//! Seven day-columns side by side, each holding task cards. The app owns the
//! `Board` (store + sync + rendered view) and translates key presses into
//! board operations: add a card, press its Save/Edit button, pick a status,
//! move between weeks.

use std::io;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tracing::info;

use crate::board::Board;
use crate::card::{Card, CardEvent};
use crate::error::Result;
use crate::fields::{Status, SELECTABLE_STATUSES};
use crate::tui::colors::{card_color, card_text_color, DARK_PURPLE};
use crate::tui::enums::{AppState, Focus, InputMode};
use crate::week::{self, DAYS_IN_WEEK, DAY_NAMES};

const CARD_HEIGHT: usize = 5;

/// Main board application state.
pub struct WeekApp {
    board: Board,
    today: NaiveDate,
    state: AppState,
    input_mode: InputMode,
    focus: Focus,
    status_message: String,
    column_scroll_offsets: [usize; DAYS_IN_WEEK],
}

impl WeekApp {
    /// Open `week_key` on the board and focus today's column if it is in view.
    pub fn new(mut board: Board, week_key: &str, today: NaiveDate) -> Result<Self> {
        board.open_week(week_key)?;
        let mut app = WeekApp {
            board,
            today,
            state: AppState::Board,
            input_mode: InputMode::None,
            focus: Focus::new(1),
            status_message: String::new(),
            column_scroll_offsets: [0; DAYS_IN_WEEK],
        };
        app.focus_today();
        Ok(app)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    fn focus_today(&mut self) {
        let day = if self.board.week_key() == Some(week::key_of(self.today).as_str()) {
            self.today.weekday().num_days_from_monday() as usize + 1
        } else {
            1
        };
        self.focus = Focus::new(day);
        self.clamp_selection();
    }

    fn cards_in(&self, day: usize) -> usize {
        self.board.view().column(day).map_or(0, |c| c.cards.len())
    }

    fn selected_card(&self) -> Option<&Card> {
        self.board.card(self.focus.day, self.focus.card)
    }

    /// Keep the selection inside the current column and leave text mode if
    /// the selected card cannot take input.
    fn clamp_selection(&mut self) {
        self.focus.day = self.focus.day.clamp(1, DAYS_IN_WEEK);
        let len = self.cards_in(self.focus.day);
        if len == 0 {
            self.focus.card = 0;
        } else if self.focus.card >= len {
            self.focus.card = len - 1;
        }
        if !self.selected_card().is_some_and(Card::is_editable) {
            self.input_mode = InputMode::None;
        }
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    fn go_to_week(&mut self, week_key: &str) {
        match self.board.open_week(week_key) {
            Ok(()) => {
                self.column_scroll_offsets = [0; DAYS_IN_WEEK];
                self.input_mode = InputMode::None;
                self.focus_today();
                let key = self.board.week_key().unwrap_or_default().to_string();
                info!(week_key = %key, "week opened");
                self.set_status_message(format!("Week of {key}"));
            }
            Err(e) => self.set_status_message(format!("Cannot open week: {e}")),
        }
    }

    fn shift_week(&mut self, weeks: i64) {
        let Some(current) = self.board.week_key().map(str::to_string) else {
            return;
        };
        match week::shift_week(&current, weeks) {
            Ok(key) => self.go_to_week(&key),
            Err(e) => self.set_status_message(format!("Cannot move week: {e}")),
        }
    }

    fn add_card(&mut self) {
        match self.board.add_task(self.focus.day) {
            Some(idx) => {
                self.focus.card = idx;
                self.input_mode = InputMode::Text;
                self.set_status_message("New task: type, Tab for status, Enter to save".to_string());
            }
            None => self.set_status_message("This day cannot take new tasks".to_string()),
        }
    }

    fn press_primary(&mut self) {
        match self.board.primary_action(self.focus.day, self.focus.card) {
            Ok(Some(CardEvent::Committed(task))) => {
                self.input_mode = InputMode::None;
                self.set_status_message(format!("Saved: {}", task.display_line()));
            }
            Ok(Some(CardEvent::EditStarted)) => {
                self.input_mode = InputMode::Text;
                self.set_status_message("Editing task".to_string());
            }
            Ok(None) => {}
            Err(_) => self.set_status_message("No task selected".to_string()),
        }
    }

    fn pick_status(&mut self, status: Status) {
        if !self.board.select_status(self.focus.day, self.focus.card, status) {
            self.set_status_message("Press Enter to edit before changing status".to_string());
        }
    }

    /// Move the checked option to the next selectable status.
    fn cycle_status(&mut self) {
        let Some(card) = self.selected_card() else { return };
        let next = match card.checked() {
            None => SELECTABLE_STATUSES[0],
            Some(current) => {
                let pos = SELECTABLE_STATUSES.iter().position(|s| *s == current).unwrap_or(0);
                SELECTABLE_STATUSES[(pos + 1) % SELECTABLE_STATUSES.len()]
            }
        };
        self.pick_status(next);
    }

    /// Handle a single key press. Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        match self.state {
            AppState::Help => {
                self.state = AppState::Board;
                false
            }
            AppState::ConfirmClear => {
                self.handle_confirm_input(key.code);
                false
            }
            AppState::Board => match self.input_mode {
                InputMode::Text => {
                    self.handle_text_input(key.code);
                    false
                }
                InputMode::None => self.handle_board_input(key.code),
            },
        }
    }

    fn handle_text_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => return self.press_primary(),
            KeyCode::Esc => {
                self.input_mode = InputMode::None;
                self.clear_status_message();
                return;
            }
            KeyCode::Tab => return self.cycle_status(),
            _ => {}
        }

        let Some(input) = self
            .board
            .card_mut(self.focus.day, self.focus.card)
            .and_then(|card| card.input_mut())
        else {
            self.input_mode = InputMode::None;
            return;
        };
        match key {
            KeyCode::Char(c) => input.handle_char(c),
            KeyCode::Backspace => input.handle_backspace(),
            KeyCode::Delete => input.handle_delete(),
            KeyCode::Left => input.move_cursor_left(),
            KeyCode::Right => input.move_cursor_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            _ => {}
        }
    }

    fn handle_board_input(&mut self, key: KeyCode) -> bool {
        self.clear_status_message();
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Left | KeyCode::Char('h') => {
                if self.focus.day > 1 {
                    self.focus.day -= 1;
                    self.clamp_selection();
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.focus.day < DAYS_IN_WEEK {
                    self.focus.day += 1;
                    self.clamp_selection();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.focus.card = self.focus.card.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.focus.card + 1 < self.cards_in(self.focus.day) {
                    self.focus.card += 1;
                }
            }
            KeyCode::Char('a') => self.add_card(),
            KeyCode::Enter | KeyCode::Char('e') => self.press_primary(),
            KeyCode::Char('i') => {
                if self.selected_card().is_some_and(Card::is_editable) {
                    self.input_mode = InputMode::Text;
                }
            }
            KeyCode::Char(c @ '1'..='3') => {
                let idx = c as usize - '1' as usize;
                self.pick_status(SELECTABLE_STATUSES[idx]);
            }
            KeyCode::Tab => self.cycle_status(),
            KeyCode::Char('[') => self.shift_week(-1),
            KeyCode::Char(']') => self.shift_week(1),
            KeyCode::Char('t') => {
                let key = week::key_of(self.today);
                self.go_to_week(&key);
            }
            KeyCode::Char('r') => match self.board.reload() {
                Ok(()) => {
                    self.clamp_selection();
                    self.set_status_message("Week reloaded".to_string());
                }
                Err(e) => self.set_status_message(format!("Reload failed: {e}")),
            },
            KeyCode::Char('X') => self.state = AppState::ConfirmClear,
            KeyCode::Char('?') => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        self.state = AppState::Board;
        if matches!(key, KeyCode::Char('y') | KeyCode::Char('Y')) {
            match self.board.clear_week() {
                Ok(()) => {
                    self.clamp_selection();
                    self.set_status_message("Week cleared".to_string());
                }
                Err(e) => self.set_status_message(format!("Clear failed: {e}")),
            }
        } else {
            self.set_status_message("Clear cancelled".to_string());
        }
    }

    /// Render the whole board.
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_board(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);

        match self.state {
            AppState::Help => self.render_help(f),
            AppState::ConfirmClear => self.render_confirm(f),
            AppState::Board => {}
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let range = match self.board.monday() {
            Some(monday) => format!(
                "{} to {}",
                monday.format("%d %b"),
                week::day_date(monday, DAYS_IN_WEEK - 1).format("%d %b %Y")
            ),
            None => String::new(),
        };
        let header_text = vec![Line::from(vec![
            Span::styled("WEEKLY BOARD", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("Week of {}  {}", self.board.week_key().unwrap_or("-"), range),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];

        let header_block = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header_block, area);
    }

    fn render_board(&mut self, f: &mut Frame, area: Rect) {
        let constraints: Vec<Constraint> = (0..DAYS_IN_WEEK)
            .map(|_| Constraint::Ratio(1, DAYS_IN_WEEK as u32))
            .collect();
        let columns_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (i, &column_area) in columns_layout.iter().enumerate() {
            self.render_column(f, column_area, i + 1);
        }
    }

    fn render_column(&mut self, f: &mut Frame, area: Rect, day: usize) {
        let is_selected = day == self.focus.day;
        let monday = self.board.monday();
        let is_today = monday.is_some_and(|m| week::day_date(m, day - 1) == self.today);

        let date = self
            .board
            .view()
            .column(day)
            .and_then(|c| c.date)
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into());
        let title = if is_today {
            format!(" {} {} (today) ", DAY_NAMES[day - 1], date)
        } else {
            format!(" {} {} ", DAY_NAMES[day - 1], date)
        };
        let border_style = if is_selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let card_count = self.cards_in(day);
        if card_count == 0 {
            if is_selected {
                let hint = Paragraph::new("a: add task").style(Style::default().fg(Color::DarkGray));
                f.render_widget(hint, Rect { height: inner.height.min(1), ..inner });
            }
            return;
        }

        let available_height = inner.height as usize;
        let visible_cards = (available_height / CARD_HEIGHT).max(1);
        let idx = day - 1;
        let scroll_offset = if is_selected {
            let start_visible = self.column_scroll_offsets[idx];
            if self.focus.card < start_visible {
                self.focus.card
            } else if self.focus.card >= start_visible + visible_cards {
                self.focus.card + 1 - visible_cards
            } else {
                start_visible
            }
        } else {
            self.column_scroll_offsets[idx].min(card_count - 1)
        };
        self.column_scroll_offsets[idx] = scroll_offset;

        let typing = self.input_mode == InputMode::Text;
        let Some(column) = self.board.view().column(day) else { return };
        let mut current_y = 0;
        for (card_index, card) in column.cards.iter().enumerate().skip(scroll_offset) {
            if current_y + CARD_HEIGHT > available_height {
                break;
            }
            let card_area = Rect {
                x: inner.x,
                y: inner.y + current_y as u16,
                width: inner.width,
                height: CARD_HEIGHT as u16,
            };
            let selected = is_selected && card_index == self.focus.card;
            Self::render_card(f, card_area, card, selected, selected && typing);
            current_y += CARD_HEIGHT;
        }

        let remaining = card_count.saturating_sub(scroll_offset + current_y / CARD_HEIGHT);
        if remaining > 0 && inner.height > 0 {
            let indicator = Paragraph::new(format!("▼ +{remaining} below"))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(indicator, Rect {
                y: inner.y + inner.height - 1,
                height: 1,
                ..inner
            });
        }
    }

    /// Draw one card: text line, status options, action button.
    fn render_card(f: &mut Frame, area: Rect, card: &Card, is_selected: bool, typing: bool) {
        let style = Style::default()
            .bg(card_color(card.style()))
            .fg(card_text_color(card.style()));

        let first_line = match card.display_line() {
            Some(line) => Line::from(line),
            None => Line::from(format!("> {}", card.input().value)),
        };

        let option_style = if card.is_editable() {
            Style::default()
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let mut options = Vec::new();
        for (i, status) in SELECTABLE_STATUSES.iter().enumerate() {
            let mark = if card.checked() == Some(*status) { "(•)" } else { "( )" };
            options.push(Span::styled(format!("{mark}{} ", i + 1), option_style));
        }

        let button = Line::from(Span::styled(
            format!("[{}]", card.action_label()),
            Style::default().add_modifier(Modifier::BOLD),
        ));

        let border_style = if is_selected {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);

        let paragraph = Paragraph::new(vec![first_line, Line::from(options), button])
            .block(block)
            .style(style);
        f.render_widget(paragraph, area);

        if typing && card.is_editable() {
            let x = inner.x + 2 + card.input().cursor as u16;
            if x < inner.x + inner.width {
                f.set_cursor_position((x, inner.y));
            }
        }
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.input_mode == InputMode::Text {
            "Editing | Type text | Tab: Status | Enter: Save | Esc: Leave input".to_string()
        } else {
            let status_hint = self
                .selected_card()
                .map(|c| format!(" | Selected: {}", c.style().label()))
                .unwrap_or_default();
            format!(
                "a: Add | Enter: Save/Edit | 1-3: Status | [ ]: Week | t: Today | X: Clear | ?: Help | q: Quit{status_hint}"
            )
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(DARK_PURPLE).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn popup_area(f: &Frame, percent_x: u16, height: u16) -> Rect {
        Self::centered_rect(f.area(), percent_x, height)
    }

    /// Rect `percent_x` wide and `height` tall, centred in `area`.
    fn centered_rect(area: Rect, percent_x: u16, height: u16) -> Rect {
        let width = (u32::from(area.width) * u32::from(percent_x) / 100) as u16;
        let height = height.min(area.height);
        Rect::new(
            (area.width - width) / 2,
            (area.height - height) / 2,
            width,
            height,
        )
    }

    fn render_help(&self, f: &mut Frame) {
        let lines = vec![
            Line::from(Span::styled("Keys", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from("←/→ h/l    Change day"),
            Line::from("↑/↓ k/j    Change card"),
            Line::from("a          Add a task to the selected day"),
            Line::from("Enter / e  Save the card, or edit a saved card"),
            Line::from("i          Focus the input of an editable card"),
            Line::from("1 2 3      Completed / Abandoned / In Process"),
            Line::from("Tab        Cycle status"),
            Line::from("[ ]        Previous / next week"),
            Line::from("t          This week"),
            Line::from("r          Reload week from server"),
            Line::from("X          Clear week on server"),
            Line::from("q          Quit"),
        ];
        let area = Self::popup_area(f, 60, lines.len() as u16 + 2);
        f.render_widget(Clear, area);
        let help = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help (any key to close)")
                .title_alignment(Alignment::Center),
        );
        f.render_widget(help, area);
    }

    fn render_confirm(&self, f: &mut Frame) {
        let area = Self::popup_area(f, 50, 3);
        f.render_widget(Clear, area);
        let text = format!(
            "Clear week {} on the server? (y/n)",
            self.board.week_key().unwrap_or("-")
        );
        let confirm = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            );
        f.render_widget(confirm, area);
    }

    /// Main event loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key(key) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
