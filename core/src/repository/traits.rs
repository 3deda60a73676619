use crate::model::task::Task;
use anyhow::Result;

pub trait TaskRepository {
    /// Reads the whole collection. Missing or unreadable data yields an empty list.
    fn load(&self) -> Vec<Task>;
    /// Overwrites the persisted collection with `tasks`.
    fn save(&self, tasks: &[Task]) -> Result<()>;
}
