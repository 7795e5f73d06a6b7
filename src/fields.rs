//! Status values for task cards and their label/style lookup tables.

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

/// Task status as shown on a card.
///
/// Stored on the wire by label (`"In Process"`, `"No status"`...). Labels the
/// board does not know decode as [`Status::Default`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Completed,
    Abandoned,
    InProcess,
    NoStatus,
    #[value(skip)]
    Default,
}

/// Options a user can pick on an editable card, in display order.
pub const SELECTABLE_STATUSES: [Status; 3] = [Status::Completed, Status::Abandoned, Status::InProcess];

/// Style tokens a card can carry. Exactly one is active at a time.
pub const STYLE_TOKENS: [&str; 5] = ["completed", "abandoned", "in-process", "no-status", "default"];

impl Status {
    /// Label used on the wire and in the card's display line.
    pub fn label(self) -> &'static str {
        match self {
            Status::Completed => "Completed",
            Status::Abandoned => "Abandoned",
            Status::InProcess => "In Process",
            Status::NoStatus => "No status",
            Status::Default => "default",
        }
    }

    /// Visual class for a card in this status.
    pub fn style_token(self) -> &'static str {
        match self {
            Status::Completed => "completed",
            Status::Abandoned => "abandoned",
            Status::InProcess => "in-process",
            Status::NoStatus => "no-status",
            Status::Default => "default",
        }
    }

    /// Parse a label; unknown labels fall back to `Default`.
    pub fn from_label(s: &str) -> Status {
        match s.trim() {
            "Completed" => Status::Completed,
            "Abandoned" => Status::Abandoned,
            "In Process" => Status::InProcess,
            "No status" => Status::NoStatus,
            _ => Status::Default,
        }
    }

    /// Whether this status is one of the user-pickable options.
    pub fn is_selectable(self) -> bool {
        SELECTABLE_STATUSES.contains(&self)
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Default
    }
}

/// Decode a task's `status` field without ever failing: null, numbers and
/// other non-string values become [`Status::Default`].
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Status, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map_or(Status::Default, Status::from_label))
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        Status::from_label(&s)
    }
}

impl From<Status> for String {
    fn from(s: Status) -> Self {
        s.label().to_string()
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
