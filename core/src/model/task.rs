use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Display ordering: High first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "h" | "high" => Ok(Priority::High),
            "m" | "med" | "medium" => Ok(Priority::Medium),
            "l" | "low" => Ok(Priority::Low),
            _ => Err(ValidationError::InvalidPriority(s.to_string())),
        }
    }
}

// Accepts any capitalisation or abbreviation, e.g. "high" or "H".
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses `created_at` with either a `T` or a space between date and time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn deserialize_created_at<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

// Ids that are not UUIDs map to a stable v5 UUID so the record survives a load.
fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(Uuid::parse_str(raw.trim())
        .unwrap_or_else(|_| Uuid::new_v5(&Uuid::NAMESPACE_OID, raw.as_bytes())))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Uuid,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(deserialize_with = "deserialize_created_at")]
    pub created_at: NaiveDateTime,
}

impl Task {
    pub fn new(description: String, due_date: Option<NaiveDate>, priority: Priority) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            due_date,
            priority,
            completed: false,
            created_at: Local::now().naive_local(),
        }
    }

    /// First eight characters of the id, as shown in listings.
    pub fn short_id(&self) -> String {
        let mut id = self.id.to_string();
        id.truncate(8);
        id
    }

    pub fn apply(&mut self, update: &TaskUpdate) {
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
    }
}

/// Field overrides merged into a task by `TaskStore::update`.
///
/// `None` leaves a field untouched. `due_date: Some(None)` clears the date.
/// `id` and `created_at` cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub description: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self == &TaskUpdate::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}
