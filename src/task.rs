//! Task data structures.
//!
//! A `Task` is one card on the board. Tasks are grouped per day into an
//! ordered list, and a week maps day indices (Monday=0) to those lists.

use std::collections::BTreeMap;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::fields::{self, Status};

/// Identifier of a task within its day list. Assigned once, never regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Time-based token with a random decimal suffix.
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let suffix: u64 = rand::thread_rng().gen_range(0..10_000_000_000);
        TaskId(format!("{millis}{suffix:010}"))
    }

}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A committed task card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "fields::deserialize_lenient")]
    pub status: Status,
}

impl Task {
    /// The read-only line shown on a saved card.
    pub fn display_line(&self) -> String {
        format!("{} - {}", self.text, self.status)
    }
}

/// Tasks of one week keyed by day index. Missing days are empty.
///
/// Serialises as `{"0": [...], "3": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekTasks(pub BTreeMap<usize, Vec<Task>>);

impl WeekTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks for a day, empty if the day is absent.
    pub fn day(&self, day_index: usize) -> &[Task] {
        self.0.get(&day_index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mutable list for a day, created on first use.
    pub fn day_mut(&mut self, day_index: usize) -> &mut Vec<Task> {
        self.0.entry(day_index).or_default()
    }

    /// Total number of tasks across all days.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Body exchanged with the backend: `{ "days": WeekTasks }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekPayload {
    #[serde(default)]
    pub days: WeekTasks,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = TaskId::generate();
        let b = TaskId::generate();
        assert_ne!(a, b);
        assert!(a.0.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_week_tasks_json_shape() {
        let mut week = WeekTasks::new();
        week.day_mut(2).push(Task {
            id: TaskId("17".into()),
            text: "Write report".into(),
            status: Status::InProcess,
        });
        let json = serde_json::to_value(WeekPayload { days: week.clone() }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"days": {"2": [{"id": "17", "text": "Write report", "status": "In Process"}]}})
        );
        let back: WeekPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back.days, week);
    }

    #[test]
    fn test_missing_day_is_empty() {
        let week = WeekTasks::new();
        assert!(week.day(4).is_empty());
        assert!(week.is_empty());
        let payload: WeekPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.days.is_empty());
    }

    #[test]
    fn test_bad_status_keeps_the_task() {
        let json = r#"{"days":{"0":[
            {"id":"1","text":"Keep me","status":"Completed"},
            {"id":"2","text":"legacy","status":null},
            {"id":"3","text":"no status"},
            {"id":"4","text":"numeric","status":7}
        ]}}"#;
        let payload: WeekPayload = serde_json::from_str(json).unwrap();
        let day = payload.days.day(0);
        assert_eq!(day.len(), 4);
        assert_eq!(day[0].status, Status::Completed);
        assert!(day[1..].iter().all(|t| t.status == Status::Default));
        assert_eq!(day[1].display_line(), "legacy - default");
    }

    #[test]
    fn test_display_line() {
        let task = Task {
            id: TaskId("1".into()),
            text: "Gym".into(),
            status: Status::NoStatus,
        };
        assert_eq!(task.display_line(), "Gym - No status");
    }
}
