//! Week board: seven day-columns rebuilt from the task store.
//!
//! The renderer only assumes the host exposes day containers addressable by a
//! 1-based index (Monday=1). Each render discards every card and every
//! add-task binding in those containers and builds them again, so repeated
//! renders never stack up handlers.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};

use crate::card::{Card, CardEvent, CommitTarget};
use crate::error::{BoardError, Result};
use crate::fields::Status;
use crate::store::TaskStore;
use crate::sync::SyncClient;
use crate::task::WeekTasks;
use crate::week::{self, DAYS_IN_WEEK};

/// Add-task affordance of one column, recreated on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddTaskBinding {
    pub day_index: usize,
    pub generation: u64,
}

/// A day container: date slot, task cards, add-task affordance.
#[derive(Debug, Default)]
pub struct DayColumn {
    pub date: Option<u32>,
    pub cards: Vec<Card>,
    pub add_task: Option<AddTaskBinding>,
}

/// Anything that can hand out day containers by 1-based number.
pub trait DayContainers {
    fn day_container(&mut self, number: usize) -> Option<&mut DayColumn>;
}

/// Column layout held by the host. Days can be missing.
#[derive(Debug)]
pub struct BoardView {
    columns: Vec<Option<DayColumn>>,
}

impl BoardView {
    /// All seven days present.
    pub fn full() -> Self {
        BoardView {
            columns: (0..DAYS_IN_WEEK).map(|_| Some(DayColumn::default())).collect(),
        }
    }

    /// Only the given day numbers (1-based) exist.
    pub fn with_days(numbers: &[usize]) -> Self {
        BoardView {
            columns: (1..=DAYS_IN_WEEK)
                .map(|n| numbers.contains(&n).then(DayColumn::default))
                .collect(),
        }
    }

    pub fn column(&self, number: usize) -> Option<&DayColumn> {
        number
            .checked_sub(1)
            .and_then(|i| self.columns.get(i))
            .and_then(Option::as_ref)
    }

    /// Committed tasks currently shown, per day.
    pub fn read_back(&self) -> WeekTasks {
        let mut week = WeekTasks::new();
        for (i, column) in self.columns.iter().enumerate() {
            let Some(column) = column else { continue };
            for task in column.cards.iter().filter_map(Card::task) {
                week.day_mut(i).push(task);
            }
        }
        week
    }
}

impl DayContainers for BoardView {
    fn day_container(&mut self, number: usize) -> Option<&mut DayColumn> {
        number
            .checked_sub(1)
            .and_then(|i| self.columns.get_mut(i))
            .and_then(Option::as_mut)
    }
}

/// Rebuilds day containers for a week.
#[derive(Debug, Default)]
pub struct BoardRenderer {
    week_key: Option<String>,
    generation: u64,
}

impl BoardRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Week currently rendered.
    pub fn active_week(&self) -> Option<&str> {
        self.week_key.as_deref()
    }

    /// Make `week_key` active, store `week` under it and rebuild every column.
    pub fn render<H: DayContainers>(
        &mut self,
        host: &mut H,
        store: &mut TaskStore,
        week: WeekTasks,
        week_key: &str,
    ) -> Result<()> {
        let monday = week::parse_week_key(week_key)?;
        let week_key = week::key_of(monday);
        store.set(&week_key, week);
        let tasks = store.get(&week_key);

        for day_index in 0..DAYS_IN_WEEK {
            let Some(column) = host.day_container(day_index + 1) else {
                debug!(day = day_index + 1, "no container for day, skipping");
                continue;
            };
            column.date = Some(week::day_date(monday, day_index).day());
            column.cards = tasks
                .day(day_index)
                .iter()
                .map(|task| Card::saved(day_index, task))
                .collect();
        }

        self.rebind_add_task(host);
        info!(week_key = %week_key, tasks = tasks.len(), "board rendered");
        self.week_key = Some(week_key);
        Ok(())
    }

    fn rebind_add_task<H: DayContainers>(&mut self, host: &mut H) {
        self.generation += 1;
        for day_index in 0..DAYS_IN_WEEK {
            if let Some(column) = host.day_container(day_index + 1) {
                column.add_task = Some(AddTaskBinding {
                    day_index,
                    generation: self.generation,
                });
            }
        }
    }

    /// Fire the add-task affordance of day `number`: append an empty card.
    ///
    /// Returns the new card's position, or `None` if the day has no container
    /// or no affordance yet.
    pub fn add_task<H: DayContainers>(&self, host: &mut H, number: usize) -> Option<usize> {
        let column = host.day_container(number)?;
        let binding = column.add_task?;
        column.cards.push(Card::creating(binding.day_index));
        Some(column.cards.len() - 1)
    }
}

/// Application root: owns the store, the sync client and the rendered view.
pub struct Board {
    store: TaskStore,
    sync: SyncClient,
    renderer: BoardRenderer,
    view: BoardView,
}

impl Board {
    pub fn new(sync: SyncClient, view: BoardView) -> Self {
        Board {
            store: TaskStore::new(),
            sync,
            renderer: BoardRenderer::new(),
            view,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    pub fn week_key(&self) -> Option<&str> {
        self.renderer.active_week()
    }

    /// Monday of the active week.
    pub fn monday(&self) -> Option<NaiveDate> {
        self.week_key().and_then(|k| week::parse_week_key(k).ok())
    }

    /// Show a week: load it from the backend on first visit, then render.
    pub fn open_week(&mut self, week_key: &str) -> Result<()> {
        let monday = week::parse_week_key(week_key)?;
        let week_key = week::key_of(monday);
        let tasks = match self.store.week(&week_key) {
            Some(cached) => cached.clone(),
            None => self.sync.load(&week_key),
        };
        self.renderer
            .render(&mut self.view, &mut self.store, tasks, &week_key)
    }

    /// Re-fetch the active week from the backend and render it.
    pub fn reload(&mut self) -> Result<()> {
        let week_key = self.active_key()?;
        let tasks = self.sync.load(&week_key);
        self.renderer
            .render(&mut self.view, &mut self.store, tasks, &week_key)
    }

    /// Delete the active week on the backend and show it empty.
    pub fn clear_week(&mut self) -> Result<()> {
        let week_key = self.active_key()?;
        self.sync.clear(&week_key)?;
        self.renderer
            .render(&mut self.view, &mut self.store, WeekTasks::new(), &week_key)
    }

    /// Append an empty card to day `number` (1-based).
    pub fn add_task(&mut self, number: usize) -> Option<usize> {
        self.renderer.add_task(&mut self.view, number)
    }

    pub fn card(&self, number: usize, idx: usize) -> Option<&Card> {
        self.view.column(number)?.cards.get(idx)
    }

    pub fn card_mut(&mut self, number: usize, idx: usize) -> Option<&mut Card> {
        self.view.day_container(number)?.cards.get_mut(idx)
    }

    /// Press the card's Save/Edit button.
    pub fn primary_action(&mut self, number: usize, idx: usize) -> Result<Option<CardEvent>> {
        let week_key = self.active_key()?;
        let card = self
            .view
            .day_container(number)
            .and_then(|c| c.cards.get_mut(idx))
            .ok_or(BoardError::InvalidDay(number))?;
        Ok(card.primary_action(CommitTarget {
            store: &mut self.store,
            sync: &self.sync,
            week_key: &week_key,
        }))
    }

    /// Pick a status option on a card.
    pub fn select_status(&mut self, number: usize, idx: usize, status: Status) -> bool {
        self.card_mut(number, idx)
            .map(|card| card.select_status(status))
            .unwrap_or(false)
    }

    fn active_key(&self) -> Result<String> {
        self.renderer.active_week().map(str::to_string).ok_or_else(|| {
            warn!("no active week");
            BoardError::InvalidWeekKey(String::new())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardMode;
    use crate::sync::{Backend, MemoryBackend};
    use crate::task::{Task, TaskId};
    use std::sync::Arc;

    const WEEK: &str = "2024-06-10";

    fn task(id: &str, text: &str, status: Status) -> Task {
        Task {
            id: TaskId(id.into()),
            text: text.into(),
            status,
        }
    }

    fn sample_week() -> WeekTasks {
        let mut week = WeekTasks::new();
        week.day_mut(0).push(task("a", "Plan", Status::Completed));
        week.day_mut(0).push(task("b", "Email", Status::NoStatus));
        week.day_mut(4).push(task("c", "Demo", Status::InProcess));
        week
    }

    fn board() -> (Board, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let board = Board::new(SyncClient::inline(backend.clone()), BoardView::full());
        (board, backend)
    }

    #[test]
    fn test_render_sets_dates_and_cards() {
        let mut view = BoardView::full();
        let mut store = TaskStore::new();
        let mut renderer = BoardRenderer::new();
        renderer.render(&mut view, &mut store, sample_week(), WEEK).unwrap();

        assert_eq!(renderer.active_week(), Some(WEEK));
        let dates: Vec<_> = (1..=7).map(|n| view.column(n).unwrap().date.unwrap()).collect();
        assert_eq!(dates, vec![10, 11, 12, 13, 14, 15, 16]);
        let monday = view.column(1).unwrap();
        assert_eq!(monday.cards.len(), 2);
        assert_eq!(monday.cards[0].display_line().as_deref(), Some("Plan - Completed"));
        assert!(monday.cards.iter().all(|c| c.mode() == CardMode::Saved));
        assert_eq!(store.get(WEEK), sample_week());
    }

    #[test]
    fn test_render_round_trip() {
        let mut view = BoardView::full();
        let mut store = TaskStore::new();
        store.set(WEEK, sample_week());
        let mut renderer = BoardRenderer::new();
        let week = store.get(WEEK);
        renderer.render(&mut view, &mut store, week, WEEK).unwrap();
        assert_eq!(view.read_back(), sample_week());
    }

    #[test]
    fn test_rerender_replaces_cards_and_bindings() {
        let mut view = BoardView::full();
        let mut store = TaskStore::new();
        let mut renderer = BoardRenderer::new();
        renderer.render(&mut view, &mut store, sample_week(), WEEK).unwrap();
        let first = view.column(1).unwrap().add_task.unwrap().generation;
        renderer.add_task(&mut view, 1).unwrap();
        renderer.render(&mut view, &mut store, sample_week(), WEEK).unwrap();
        renderer.render(&mut view, &mut store, sample_week(), WEEK).unwrap();

        assert_eq!(view.column(1).unwrap().cards.len(), 2);
        for n in 1..=7 {
            let binding = view.column(n).unwrap().add_task.unwrap();
            assert_eq!(binding.day_index, n - 1);
            assert_eq!(binding.generation, first + 2);
        }
        // One click adds exactly one card.
        renderer.add_task(&mut view, 5).unwrap();
        assert_eq!(view.column(5).unwrap().cards.len(), 2);
    }

    #[test]
    fn test_render_files_week_under_its_monday() {
        let mut view = BoardView::full();
        let mut store = TaskStore::new();
        let mut renderer = BoardRenderer::new();
        renderer.render(&mut view, &mut store, sample_week(), "2024-06-12").unwrap();

        assert_eq!(renderer.active_week(), Some(WEEK));
        assert_eq!(store.get(WEEK), sample_week());
        assert!(store.week("2024-06-12").is_none());
        assert_eq!(view.column(1).unwrap().date, Some(10));
    }

    #[test]
    fn test_missing_containers_are_skipped() {
        let mut view = BoardView::with_days(&[1, 3]);
        let mut store = TaskStore::new();
        let mut renderer = BoardRenderer::new();
        renderer.render(&mut view, &mut store, sample_week(), WEEK).unwrap();

        assert_eq!(view.column(1).unwrap().cards.len(), 2);
        assert_eq!(view.column(3).unwrap().date, Some(12));
        assert!(view.column(5).is_none());
        assert!(renderer.add_task(&mut view, 5).is_none());
        // Store still holds the whole week.
        assert_eq!(store.get(WEEK).day(4).len(), 1);
    }

    #[test]
    fn test_add_task_does_not_touch_store() {
        let (mut board, backend) = board();
        board.open_week(WEEK).unwrap();
        let idx = board.add_task(3).unwrap();
        assert_eq!(board.card(3, idx).unwrap().mode(), CardMode::Creating);
        assert!(board.store().get(WEEK).is_empty());
        assert_eq!(backend.put_count(), 0);
    }

    #[test]
    fn test_commit_scenario_day_two() {
        let (mut board, backend) = board();
        board.open_week("2024-06-12").unwrap();
        assert_eq!(board.week_key(), Some(WEEK));

        // Day index 2 is the third column.
        let idx = board.add_task(3).unwrap();
        let input = board.card_mut(3, idx).unwrap().input_mut().unwrap();
        "Write report".chars().for_each(|c| input.handle_char(c));
        assert!(board.select_status(3, idx, Status::InProcess));
        let event = board.primary_action(3, idx).unwrap();

        let task = match event {
            Some(CardEvent::Committed(task)) => task,
            other => panic!("expected commit, got {other:?}"),
        };
        assert_eq!(board.store().get(WEEK).day(2), &[task.clone()]);
        assert_eq!(
            board.card(3, idx).unwrap().display_line().as_deref(),
            Some("Write report - In Process")
        );
        assert_eq!(backend.stored(WEEK).unwrap().day(2), &[task]);
    }

    #[test]
    fn test_two_commits_append_in_order() {
        let (mut board, _backend) = board();
        board.open_week(WEEK).unwrap();
        for text in ["first", "second"] {
            let idx = board.add_task(2).unwrap();
            let input = board.card_mut(2, idx).unwrap().input_mut().unwrap();
            text.chars().for_each(|c| input.handle_char(c));
            board.primary_action(2, idx).unwrap();
        }
        let day = board.store().get(WEEK).day(1).to_vec();
        assert_eq!(day.len(), 2);
        assert_eq!(day[0].text, "first");
        assert_eq!(day[1].text, "second");
        assert_ne!(day[0].id, day[1].id);
    }

    #[test]
    fn test_open_week_uses_cache_after_first_visit() {
        let (mut board, backend) = board();
        backend.put(WEEK, &sample_week()).unwrap();
        board.open_week(WEEK).unwrap();
        assert_eq!(board.view().read_back(), sample_week());

        // The service changes underneath; the cached week keeps winning until reload.
        backend.put(WEEK, &WeekTasks::new()).unwrap();
        board.open_week("2024-06-17").unwrap();
        board.open_week(WEEK).unwrap();
        assert_eq!(board.view().read_back(), sample_week());
        board.reload().unwrap();
        assert!(board.view().read_back().is_empty());
    }

    #[test]
    fn test_load_failure_renders_empty_week() {
        let (mut board, backend) = board();
        backend.set_failing(true);
        board.open_week(WEEK).unwrap();
        assert_eq!(board.view().column(7).unwrap().date, Some(16));
        assert!(board.view().read_back().is_empty());
    }

    #[test]
    fn test_clear_week() {
        let (mut board, backend) = board();
        backend.put(WEEK, &sample_week()).unwrap();
        board.open_week(WEEK).unwrap();
        board.clear_week().unwrap();
        assert!(backend.stored(WEEK).is_none());
        assert!(board.store().get(WEEK).is_empty());
        assert!(board.view().column(1).unwrap().cards.is_empty());
    }

    #[test]
    fn test_invalid_week_key() {
        let (mut board, _) = board();
        assert!(matches!(board.open_week("June"), Err(BoardError::InvalidWeekKey(_))));
        assert!(board.week_key().is_none());
    }
}
