use chrono::NaiveDate;

use crate::error::{validate_description, ValidationError};
use crate::model::task::{Priority, Task, TaskUpdate};
use crate::time::parse_due_date;

pub const KNOWN_KEYS: [&str; 2] = ["due", "priority"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub description: String,
    /// Expanded key and raw value, in the order they were typed.
    pub metadata: Vec<(String, String)>,
}

/// Splits `key:value` tokens from the free-text description.
///
/// A token only counts as metadata when its key is a known key or an
/// unambiguous prefix of one; `10:30`, `https://…` and `Note:` stay in the
/// description.
pub fn parse_args(args: &[String], known_keys: &[&str]) -> ParsedInput {
    let mut description_parts = Vec::new();
    let mut metadata = Vec::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                if let Ok(key) = expand_key(&key.to_lowercase(), known_keys) {
                    metadata.push((key, value.to_string()));
                    continue;
                }
            }
        }
        description_parts.push(arg.as_str());
    }

    ParsedInput {
        description: description_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String, ValidationError> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(ValidationError::UnknownKey(key.to_string())),
        _ => Err(ValidationError::AmbiguousKey {
            key: key.to_string(),
            candidates: matches.into_iter().map(String::from).collect(),
        }),
    }
}

/// A task as typed on one input line, e.g. `Buy milk due:tomorrow pri:h`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    /// Empty when no free text was given.
    pub description: String,
    /// `Some(None)` when the date was explicitly cleared (`due:none`).
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
}

impl TaskDraft {
    pub fn from_line(line: &str, today: NaiveDate) -> Result<Self, ValidationError> {
        let args: Vec<String> = line.split_whitespace().map(|s| s.to_string()).collect();
        Self::from_args(&args, today)
    }

    pub fn from_args(args: &[String], today: NaiveDate) -> Result<Self, ValidationError> {
        let parsed = parse_args(args, &KNOWN_KEYS);
        let mut draft = TaskDraft {
            description: parsed.description.trim().to_string(),
            ..Default::default()
        };

        // Later tokens override earlier ones.
        for (key, value) in parsed.metadata {
            match key.as_str() {
                "due" => {
                    draft.due_date = Some(match value.trim().to_lowercase().as_str() {
                        "" | "-" | "none" => None,
                        _ => Some(parse_due_date(&value, today)?),
                    });
                }
                "priority" => draft.priority = Some(value.parse()?),
                _ => return Err(ValidationError::UnknownKey(key)),
            }
        }

        Ok(draft)
    }

    /// Fields for a new task; the description must not be blank.
    pub fn into_new_task(self) -> Result<(String, Option<NaiveDate>, Priority), ValidationError> {
        let description = validate_description(&self.description)?.to_string();
        Ok((
            description,
            self.due_date.flatten(),
            self.priority.unwrap_or_default(),
        ))
    }

    /// Overrides for an existing task. A blank description keeps the old one.
    pub fn into_update(self) -> TaskUpdate {
        TaskUpdate {
            description: validate_description(&self.description)
                .ok()
                .map(str::to_string),
            due_date: self.due_date,
            priority: self.priority,
            completed: None,
        }
    }
}

/// Renders `task` in the input syntax, used to pre-fill the edit form.
pub fn input_line(task: &Task) -> String {
    let mut line = task.description.clone();
    if let Some(due) = task.due_date {
        line.push_str(&format!(" due:{}", due.format("%Y-%m-%d")));
    }
    line.push_str(&format!(" pri:{}", task.priority.as_str().to_lowercase()));
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_simple() {
        let parsed = parse_args(&args(&["Buy", "milk", "due:tomorrow", "PRI:H"]), &KNOWN_KEYS);
        assert_eq!(parsed.description, "Buy milk");
        assert_eq!(
            parsed.metadata,
            vec![
                ("due".to_string(), "tomorrow".to_string()),
                ("priority".to_string(), "H".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_unknown_keys_stay_in_description() {
        let parsed = parse_args(
            &args(&["Meeting", "at", "10:30", "see", "https://example.com", "Note:", "x:y"]),
            &KNOWN_KEYS,
        );
        assert_eq!(
            parsed.description,
            "Meeting at 10:30 see https://example.com Note: x:y"
        );
        assert!(parsed.metadata.is_empty());
    }

    #[test]
    fn test_parse_keeps_leading_colon_words() {
        let parsed = parse_args(&args(&[":)", "smile"]), &KNOWN_KEYS);
        assert_eq!(parsed.description, ":) smile");
        assert!(parsed.metadata.is_empty());
    }

    #[test]
    fn test_expand_key() {
        let candidates = ["due", "project", "priority"];

        assert_eq!(expand_key("d", &candidates).unwrap(), "due");
        assert_eq!(expand_key("due", &candidates).unwrap(), "due");
        assert_eq!(expand_key("pro", &candidates).unwrap(), "project");
        assert_eq!(expand_key("pri", &candidates).unwrap(), "priority");

        assert!(matches!(
            expand_key("p", &candidates),
            Err(ValidationError::AmbiguousKey { .. })
        ));
        assert_eq!(
            expand_key("x", &candidates),
            Err(ValidationError::UnknownKey("x".to_string()))
        );
    }

    #[test]
    fn test_draft_for_new_task() {
        let draft = TaskDraft::from_line("Buy milk due:2024-01-01 pri:high", today()).unwrap();
        let (description, due, priority) = draft.into_new_task().unwrap();
        assert_eq!(description, "Buy milk");
        assert_eq!(due, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(priority, Priority::High);
    }

    #[test]
    fn test_draft_defaults() {
        let (_, due, priority) = TaskDraft::from_line("Read book", today())
            .unwrap()
            .into_new_task()
            .unwrap();
        assert_eq!(due, None);
        assert_eq!(priority, Priority::Medium);
    }

    #[test]
    fn test_draft_blank_description_rejected() {
        let draft = TaskDraft::from_line("   pri:low", today()).unwrap();
        assert_eq!(draft.into_new_task(), Err(ValidationError::BlankDescription));
    }

    #[test]
    fn test_draft_bad_metadata() {
        assert_eq!(
            TaskDraft::from_line("Task due:someday", today()),
            Err(ValidationError::InvalidDate("someday".to_string()))
        );
        assert_eq!(
            TaskDraft::from_line("Task pri:urgent", today()),
            Err(ValidationError::InvalidPriority("urgent".to_string()))
        );
    }

    #[test]
    fn test_draft_keeps_colon_words_as_text() {
        for line in ["Meeting at 10:30", "Read https://example.com", "Note: buy milk", "Task project:home"] {
            let draft = TaskDraft::from_line(line, today()).unwrap();
            assert_eq!(draft.description, line);
            assert_eq!(draft.due_date, None);
            assert_eq!(draft.priority, None);
        }

        let (description, _, priority) = TaskDraft::from_line("Call at 9:15 pri:high", today())
            .unwrap()
            .into_new_task()
            .unwrap();
        assert_eq!(description, "Call at 9:15");
        assert_eq!(priority, Priority::High);
    }

    #[test]
    fn test_draft_last_value_wins() {
        let draft = TaskDraft::from_line("Task pri:h p:l", today()).unwrap();
        assert_eq!(draft.priority, Some(Priority::Low));

        let draft = TaskDraft::from_line("Task due:2024-02-01 d:none", today()).unwrap();
        assert_eq!(draft.due_date, Some(None));
    }

    #[test]
    fn test_draft_into_update() {
        let update = TaskDraft::from_line("due:none p:l", today()).unwrap().into_update();
        assert_eq!(update.description, None);
        assert_eq!(update.due_date, Some(None));
        assert_eq!(update.priority, Some(Priority::Low));
        assert_eq!(update.completed, None);

        let update = TaskDraft::from_line("New text", today()).unwrap().into_update();
        assert_eq!(update, TaskUpdate::default().description("New text"));
    }

    #[test]
    fn test_input_line_round_trips() {
        let task = Task::new(
            "Pay rent".to_string(),
            NaiveDate::from_ymd_opt(2024, 2, 1),
            Priority::High,
        );
        let line = input_line(&task);
        assert_eq!(line, "Pay rent due:2024-02-01 pri:high");

        let update = TaskDraft::from_line(&line, today()).unwrap().into_update();
        let mut copy = task.clone();
        copy.apply(&update);
        assert_eq!(copy, task);
    }
}
