//! Task card state machine.
//!
//! A card starts in `Creating` (no id, input visible, status options
//! enabled), becomes `Saved` on commit (read-only line, options disabled) and
//! toggles to `Editing` and back. Commit is the only transition that touches
//! the store or the backend; status selection and the edit toggle are local.

use tracing::info;

use crate::fields::Status;
use crate::store::TaskStore;
use crate::sync::SyncClient;
use crate::task::{Task, TaskId};
use crate::input::InputField;

/// Which face of the card is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardMode {
    Creating,
    Saved,
    Editing,
}

/// What the primary action did.
#[derive(Debug, Clone, PartialEq)]
pub enum CardEvent {
    Committed(Task),
    EditStarted,
}

/// Store, backend and week a commit writes to.
pub struct CommitTarget<'a> {
    pub store: &'a mut TaskStore,
    pub sync: &'a SyncClient,
    pub week_key: &'a str,
}

/// One task card in a day column.
#[derive(Debug, Clone)]
pub struct Card {
    day_index: usize,
    id: Option<TaskId>,
    mode: CardMode,
    input: InputField,
    text: String,
    status: Status,
    checked: Option<Status>,
    style: Status,
}

impl Card {
    /// A fresh, empty card awaiting its first commit.
    pub fn creating(day_index: usize) -> Self {
        Card {
            day_index,
            id: None,
            mode: CardMode::Creating,
            input: InputField::new(),
            text: String::new(),
            status: Status::Default,
            checked: None,
            style: Status::Default,
        }
    }

    /// A card showing an already committed task.
    pub fn saved(day_index: usize, task: &Task) -> Self {
        Card {
            day_index,
            id: Some(task.id.clone()),
            mode: CardMode::Saved,
            input: InputField::new(),
            text: task.text.clone(),
            status: task.status,
            checked: task.status.is_selectable().then_some(task.status),
            style: task.status,
        }
    }

    pub fn mode(&self) -> CardMode {
        self.mode
    }

    /// The checked status option, if any.
    pub fn checked(&self) -> Option<Status> {
        self.checked
    }

    /// Visual class currently applied to the card.
    pub fn style(&self) -> Status {
        self.style
    }

    /// Whether the text input and status options are live.
    pub fn is_editable(&self) -> bool {
        self.mode != CardMode::Saved
    }

    pub fn input(&self) -> &InputField {
        &self.input
    }

    /// Input for keystrokes; `None` while the card is read-only.
    pub fn input_mut(&mut self) -> Option<&mut InputField> {
        if self.is_editable() {
            Some(&mut self.input)
        } else {
            None
        }
    }

    /// Label of the primary action button.
    pub fn action_label(&self) -> &'static str {
        match self.mode {
            CardMode::Saved => "Edit",
            CardMode::Creating | CardMode::Editing => "Save",
        }
    }

    /// `"{text} - {status}"` once saved.
    pub fn display_line(&self) -> Option<String> {
        match self.mode {
            CardMode::Saved => Some(format!("{} - {}", self.text, self.status)),
            CardMode::Creating | CardMode::Editing => None,
        }
    }

    /// The committed task, if the card has been saved at least once.
    pub fn task(&self) -> Option<Task> {
        self.id.as_ref().map(|id| Task {
            id: id.clone(),
            text: self.text.clone(),
            status: self.status,
        })
    }

    /// Pick a status option. Only previews the colour; ignored while saved.
    pub fn select_status(&mut self, status: Status) -> bool {
        if !self.is_editable() || !status.is_selectable() {
            return false;
        }
        self.checked = Some(status);
        self.style = status;
        true
    }

    /// Commit the card: write it to the store, then save the owning week.
    ///
    /// Returns `None` if the card is not editable.
    pub fn commit(&mut self, target: CommitTarget<'_>) -> Option<Task> {
        if !self.is_editable() {
            return None;
        }
        let text = self.input.trimmed().to_string();
        let status = self.checked.unwrap_or(Status::NoStatus);
        let id = self.id.get_or_insert_with(TaskId::generate).clone();

        let task = Task { id, text, status };
        target
            .store
            .upsert_task(target.week_key, self.day_index, task.clone());
        target.sync.save(target.store, target.week_key);

        info!(week_key = target.week_key, day = self.day_index, id = %task.id, "task committed");
        self.text = task.text.clone();
        self.status = status;
        self.style = status;
        self.mode = CardMode::Saved;
        self.input = InputField::new();
        Some(task)
    }

    /// Reopen a saved card for editing. Does not touch the store.
    pub fn edit(&mut self) -> bool {
        if self.mode != CardMode::Saved {
            return false;
        }
        self.input = InputField::with_value(&self.text);
        self.mode = CardMode::Editing;
        true
    }

    /// The card's single button: commit when editable, otherwise start editing.
    pub fn primary_action(&mut self, target: CommitTarget<'_>) -> Option<CardEvent> {
        match self.mode {
            CardMode::Saved => self.edit().then_some(CardEvent::EditStarted),
            CardMode::Creating | CardMode::Editing => self.commit(target).map(CardEvent::Committed),
        }
    }
}
