//! In-memory task store keyed by week.
//!
//! The store is the single source of truth for both rendering and what gets
//! sent to the backend. It is owned by the application root and handed to the
//! renderer and card controllers by reference; all access stays on the UI
//! thread.

use std::collections::HashMap;

use tracing::debug;

use crate::task::{Task, WeekTasks};

/// Week-key -> tasks of that week.
#[derive(Debug, Default)]
pub struct TaskStore {
    weeks: HashMap<String, WeekTasks>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tasks of a week, empty if the week was never loaded.
    pub fn get(&self, week_key: &str) -> WeekTasks {
        self.weeks.get(week_key).cloned().unwrap_or_default()
    }

    /// Borrowing variant of [`TaskStore::get`].
    pub fn week(&self, week_key: &str) -> Option<&WeekTasks> {
        self.weeks.get(week_key)
    }

    /// Replace a week wholesale.
    pub fn set(&mut self, week_key: &str, week: WeekTasks) {
        debug!(week_key, tasks = week.len(), "store set");
        self.weeks.insert(week_key.to_string(), week);
    }

    /// Replace the task with the same id in place, or append it to the day.
    ///
    /// Returns the task's position in the day list.
    pub fn upsert_task(&mut self, week_key: &str, day_index: usize, task: Task) -> usize {
        let day = self
            .weeks
            .entry(week_key.to_string())
            .or_default()
            .day_mut(day_index);
        match day.iter().position(|t| t.id == task.id) {
            Some(idx) => {
                day[idx] = task;
                idx
            }
            None => {
                day.push(task);
                day.len() - 1
            }
        }
    }
}
