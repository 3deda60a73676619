//! Read-only projections of the collection used by the presentation layer:
//! status filter, display ordering, statistics and short-id lookup.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LookupError;
use crate::model::task::Task;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Incomplete,
    Completed,
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Incomplete => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }

    pub fn apply(self, tasks: &[Task]) -> Vec<Task> {
        tasks.iter().filter(|t| self.matches(t)).cloned().collect()
    }

    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Incomplete,
            StatusFilter::Incomplete => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Incomplete => "Incomplete",
            StatusFilter::Completed => "Completed",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "a" => Ok(StatusFilter::All),
            "incomplete" | "pending" | "i" => Ok(StatusFilter::Incomplete),
            "completed" | "done" | "c" => Ok(StatusFilter::Completed),
            _ => Err(format!("unknown filter '{}' (all, incomplete, completed)", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Newest first.
    #[default]
    CreatedDate,
    Priority,
    /// Earliest first, undated last.
    DueDate,
}

impl SortKey {
    pub fn sort(self, tasks: &mut [Task]) {
        match self {
            SortKey::CreatedDate => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortKey::Priority => tasks.sort_by_key(|t| t.priority.rank()),
            SortKey::DueDate => tasks.sort_by_key(|t| t.due_date.unwrap_or(NaiveDate::MAX)),
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortKey::CreatedDate => SortKey::Priority,
            SortKey::Priority => SortKey::DueDate,
            SortKey::DueDate => SortKey::CreatedDate,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::CreatedDate => "Created Date",
            SortKey::Priority => "Priority",
            SortKey::DueDate => "Due Date",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" | "created_date" | "created-date" => Ok(SortKey::CreatedDate),
            "priority" | "pri" => Ok(SortKey::Priority),
            "due" | "due_date" | "due-date" => Ok(SortKey::DueDate),
            _ => Err(format!("unknown sort key '{}' (created, priority, due)", s)),
        }
    }
}

/// Filtered and sorted copy of `tasks` for display. `tasks` keeps its on-disk order.
pub fn visible_tasks(tasks: &[Task], filter: StatusFilter, sort: SortKey) -> Vec<Task> {
    let mut shown = filter.apply(tasks);
    sort.sort(&mut shown);
    shown
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total: tasks.len(),
            completed,
            pending: tasks.len() - completed,
        }
    }

    /// Completed share in `[0, 1]`; zero for an empty collection.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Resolves a full or shortened id as typed by the user.
pub fn find_by_id_prefix(tasks: &[Task], prefix: &str) -> Result<Uuid, LookupError> {
    let needle = prefix.trim().to_lowercase();
    if needle.is_empty() {
        return Err(LookupError::NotFound(prefix.to_string()));
    }

    let matches: Vec<Uuid> = tasks
        .iter()
        .map(|t| t.id)
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(LookupError::NotFound(prefix.to_string())),
        _ => Err(LookupError::Ambiguous {
            prefix: prefix.to_string(),
            count: matches.len(),
        }),
    }
}
