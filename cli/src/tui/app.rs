use anyhow::Result;
use chrono::Local;
use log::debug;
use ratatui::widgets::TableState;
use tasklist_core::{
    input_line, visible_tasks, SortKey, StatusFilter, Task, TaskDraft, TaskRepository,
    TaskStats, TaskStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Adding,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

/// State of one interactive session.
///
/// `tasks` is the collection as last returned by the store; `visible` is the
/// filtered and sorted view the table shows and `state` indexes into it.
pub struct App<R: TaskRepository> {
    store: TaskStore<R>,
    pub tasks: Vec<Task>,
    pub visible: Vec<Task>,
    pub filter: StatusFilter,
    pub sort: SortKey,
    pub state: TableState,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub message: Option<Message>,
}

impl<R: TaskRepository> App<R> {
    pub fn new(store: TaskStore<R>, filter: StatusFilter, sort: SortKey) -> Self {
        let tasks = store.load();
        let mut app = App {
            store,
            tasks,
            visible: Vec::new(),
            filter,
            sort,
            state: TableState::default(),
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            message: None,
        };
        app.refresh();
        app
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.visible.get(i))
    }

    /// Rebuilds the visible list, keeping the selection in range.
    fn refresh(&mut self) {
        self.visible = visible_tasks(&self.tasks, self.filter, self.sort);
        let selected = match self.state.selected() {
            _ if self.visible.is_empty() => None,
            Some(i) if i >= self.visible.len() => Some(self.visible.len() - 1),
            Some(i) => Some(i),
            None => Some(0),
        };
        self.state.select(selected);
    }

    fn select_id(&mut self, id: uuid::Uuid) {
        if let Some(pos) = self.visible.iter().position(|t| t.id == id) {
            self.state.select(Some(pos));
        }
    }

    pub fn next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.visible.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.visible.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.refresh();
    }

    pub fn cycle_sort(&mut self) {
        let selected = self.selected_task().map(|t| t.id);
        self.sort = self.sort.next();
        self.refresh();
        if let Some(id) = selected {
            self.select_id(id);
        }
    }

    pub fn toggle_status(&mut self) -> Result<()> {
        let Some((id, completed)) = self.selected_task().map(|t| (t.id, t.completed)) else {
            return Ok(());
        };
        let tasks = std::mem::take(&mut self.tasks);
        self.tasks = self.store.toggle_completion(tasks, id, !completed)?;
        self.refresh();
        Ok(())
    }

    pub fn delete_task(&mut self) -> Result<()> {
        let Some(id) = self.selected_task().map(|t| t.id) else {
            return Ok(());
        };
        let tasks = std::mem::take(&mut self.tasks);
        self.tasks = self.store.delete(tasks, id)?;
        self.refresh();
        self.info("Task deleted.");
        Ok(())
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input.clear();
        self.cursor_position = 0;
        self.message = None;
    }

    pub fn enter_edit_mode(&mut self) {
        let Some(line) = self.selected_task().map(input_line) else {
            return;
        };
        self.input_mode = InputMode::Editing;
        self.cursor_position = line.chars().count();
        self.input = line;
        self.message = None;
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.byte_index(self.cursor_position);
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index = self.byte_index(self.cursor_position - 1);
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.input
            .chars()
            .take(char_index)
            .map(|c| c.len_utf8())
            .sum()
    }

    /// Submits the form. Input errors stay in the form with a message;
    /// storage errors are returned.
    pub fn submit_command(&mut self) -> Result<()> {
        let today = Local::now().date_naive();
        let draft = match TaskDraft::from_line(&self.input, today) {
            Ok(draft) => draft,
            Err(err) => {
                self.error(err.to_string());
                return Ok(());
            }
        };

        match self.input_mode {
            InputMode::Adding => {
                let (description, due_date, priority) = match draft.into_new_task() {
                    Ok(fields) => fields,
                    Err(err) => {
                        self.error(err.to_string());
                        return Ok(());
                    }
                };
                let tasks = std::mem::take(&mut self.tasks);
                self.tasks = self.store.add(tasks, &description, due_date, priority)?;
                let new_id = self.tasks.last().map(|t| t.id);
                self.refresh();
                if let Some(id) = new_id {
                    self.select_id(id);
                }
                self.info("Task added successfully!");
            }
            InputMode::Editing => {
                let Some(id) = self.selected_task().map(|t| t.id) else {
                    self.exit_input_mode();
                    return Ok(());
                };
                let update = draft.into_update();
                let tasks = std::mem::take(&mut self.tasks);
                self.tasks = self.store.update(tasks, id, &update)?;
                self.refresh();
                self.select_id(id);
                self.info("Task updated.");
            }
            InputMode::Normal => return Ok(()),
        }

        self.exit_input_mode();
        Ok(())
    }

    fn info(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            kind: MessageKind::Info,
            text: text.into(),
        });
    }

    fn error(&mut self, text: impl Into<String>) {
        let text = text.into();
        debug!("rejected input: {}", text);
        self.message = Some(Message {
            kind: MessageKind::Error,
            text,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_core::{FileTaskRepository, Priority};
    use tempfile::TempDir;

    fn app() -> (TempDir, App<FileTaskRepository>) {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(FileTaskRepository::new(dir.path()).unwrap());
        let app = App::new(store, StatusFilter::All, SortKey::CreatedDate);
        (dir, app)
    }

    fn type_line(app: &mut App<FileTaskRepository>, line: &str) {
        for c in line.chars() {
            app.input_char(c);
        }
    }

    fn add(app: &mut App<FileTaskRepository>, line: &str) {
        app.enter_add_mode();
        type_line(app, line);
        app.submit_command().unwrap();
    }

    #[test]
    fn test_add_selects_new_task_and_persists() {
        let (dir, mut app) = app();
        add(&mut app, "Buy milk due:2024-01-01 pri:high");

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.tasks.len(), 1);
        let task = app.selected_task().unwrap();
        assert_eq!(task.description, "Buy milk");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(app.message.as_ref().unwrap().kind, MessageKind::Info);

        let reloaded = FileTaskRepository::new(dir.path()).unwrap().load();
        assert_eq!(reloaded, app.tasks);
    }

    #[test]
    fn test_blank_description_keeps_form_open() {
        let (_dir, mut app) = app();
        add(&mut app, "   pri:low");

        assert!(app.tasks.is_empty());
        assert_eq!(app.input_mode, InputMode::Adding);
        let message = app.message.clone().unwrap();
        assert_eq!(message.kind, MessageKind::Error);
        assert_eq!(message.text, "Please enter a task description.");
    }

    #[test]
    fn test_toggle_and_filter() {
        let (_dir, mut app) = app();
        add(&mut app, "first");
        add(&mut app, "second");

        app.toggle_status().unwrap();
        let done_id = app.selected_task().unwrap().id;
        assert!(app.tasks.iter().find(|t| t.id == done_id).unwrap().completed);

        app.cycle_filter();
        assert_eq!(app.filter, StatusFilter::Incomplete);
        assert_eq!(app.visible.len(), 1);
        assert!(app.visible.iter().all(|t| !t.completed));

        app.cycle_filter();
        assert_eq!(app.filter, StatusFilter::Completed);
        assert_eq!(app.visible.len(), 1);
        assert_eq!(app.visible[0].id, done_id);

        app.toggle_status().unwrap();
        assert!(app.visible.is_empty());
        assert_eq!(app.state.selected(), None);
    }

    #[test]
    fn test_edit_prefills_and_updates() {
        let (_dir, mut app) = app();
        add(&mut app, "Pay rent pri:low");

        app.enter_edit_mode();
        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(app.input, "Pay rent pri:low");
        for _ in 0.."low".len() {
            app.delete_char();
        }
        type_line(&mut app, "high");
        app.submit_command().unwrap();

        let task = app.selected_task().unwrap();
        assert_eq!(task.description, "Pay rent");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(app.tasks.len(), 1);
    }

    #[test]
    fn test_delete_moves_selection() {
        let (_dir, mut app) = app();
        add(&mut app, "one");
        add(&mut app, "two");
        add(&mut app, "three");

        app.state.select(Some(2));
        app.delete_task().unwrap();
        assert_eq!(app.tasks.len(), 2);
        assert_eq!(app.state.selected(), Some(1));

        app.delete_task().unwrap();
        app.delete_task().unwrap();
        assert!(app.tasks.is_empty());
        assert_eq!(app.state.selected(), None);
        // Nothing selected: no-op.
        app.delete_task().unwrap();
    }

    #[test]
    fn test_navigation_wraps() {
        let (_dir, mut app) = app();
        add(&mut app, "one");
        add(&mut app, "two");

        app.state.select(Some(1));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
        app.previous();
        assert_eq!(app.state.selected(), Some(1));
    }

    #[test]
    fn test_cursor_editing_multibyte() {
        let (_dir, mut app) = app();
        app.enter_add_mode();
        type_line(&mut app, "牛乳");
        app.move_cursor_left();
        app.input_char('x');
        assert_eq!(app.input, "牛x乳");
        app.move_cursor_right();
        app.delete_char();
        assert_eq!(app.input, "牛x");
    }
}
