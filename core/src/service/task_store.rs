use anyhow::Result;
use chrono::NaiveDate;
use log::debug;
use uuid::Uuid;

use crate::model::task::{Priority, Task, TaskUpdate};
use crate::repository::TaskRepository;

/// Mutation layer over a [`TaskRepository`].
///
/// Every operation takes the caller's collection, returns the new one and
/// persists it before returning. Unknown ids are ignored.
pub struct TaskStore<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn load(&self) -> Vec<Task> {
        self.repo.load()
    }

    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        self.repo.save(tasks)
    }

    /// Appends a new task. The description is expected to be validated already.
    pub fn add(
        &self,
        mut tasks: Vec<Task>,
        description: &str,
        due_date: Option<NaiveDate>,
        priority: Priority,
    ) -> Result<Vec<Task>> {
        let task = Task::new(description.to_string(), due_date, priority);
        debug!("adding task {} priority={}", task.id, task.priority);
        tasks.push(task);
        self.repo.save(&tasks)?;
        Ok(tasks)
    }

    pub fn update(&self, mut tasks: Vec<Task>, id: Uuid, fields: &TaskUpdate) -> Result<Vec<Task>> {
        match tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.apply(fields);
                debug!("updated task {}", id);
            }
            None => debug!("update: no task with id {}", id),
        }
        self.repo.save(&tasks)?;
        Ok(tasks)
    }

    pub fn delete(&self, mut tasks: Vec<Task>, id: Uuid) -> Result<Vec<Task>> {
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        debug!("delete {}: removed {}", id, before - tasks.len());
        self.repo.save(&tasks)?;
        Ok(tasks)
    }

    pub fn toggle_completion(&self, tasks: Vec<Task>, id: Uuid, status: bool) -> Result<Vec<Task>> {
        self.update(tasks, id, &TaskUpdate::default().completed(status))
    }
}
