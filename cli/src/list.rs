use tabled::settings::Style;
use tabled::{Table, Tabled};
use tasklist_core::{Task, TaskStats};
use unicode_width::UnicodeWidthChar;

const MAX_DESCRIPTION_WIDTH: usize = 48;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Priority")]
    priority: &'static str,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl TaskRow {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.short_id(),
            done: if task.completed { "x" } else { "" },
            priority: task.priority.as_str(),
            due: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
            description: truncate_to_width(&task.description, MAX_DESCRIPTION_WIDTH),
        }
    }
}

pub fn render_table(tasks: &[Task]) -> String {
    let rows: Vec<TaskRow> = tasks.iter().map(TaskRow::from_task).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

pub fn render_stats(stats: &TaskStats) -> String {
    format!(
        "Pending: {}  Done: {}  Progress: {:.0}%",
        stats.pending,
        stats.completed,
        stats.progress() * 100.0
    )
}

/// Cuts `text` to at most `max` terminal columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max {
        return text.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tasklist_core::Priority;

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        // Wide characters take two columns each.
        assert_eq!(truncate_to_width("牛乳を買う", 5), "牛乳…");
    }

    #[test]
    fn test_render_table() {
        let mut done = Task::new("Call mom".to_string(), None, Priority::Low);
        done.completed = true;
        let tasks = vec![
            Task::new(
                "Buy milk".to_string(),
                NaiveDate::from_ymd_opt(2024, 1, 1),
                Priority::High,
            ),
            done,
        ];

        let out = render_table(&tasks);
        assert!(out.contains("Description"));
        assert!(out.contains("Buy milk"));
        assert!(out.contains("2024-01-01"));
        assert!(out.contains("High"));
        assert!(out.contains(&tasks[1].short_id()));
    }

    #[test]
    fn test_render_stats() {
        let stats = TaskStats {
            total: 4,
            completed: 1,
            pending: 3,
        };
        assert_eq!(render_stats(&stats), "Pending: 3  Done: 1  Progress: 25%");
    }
}
