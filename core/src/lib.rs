pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod view;

pub use config::{default_data_dir, Config};
pub use error::{validate_description, LookupError, ValidationError};
pub use input::{expand_key, input_line, parse_args, ParsedInput, TaskDraft};
pub use model::task::{Priority, Task, TaskUpdate};
pub use repository::{FileTaskRepository, TaskRepository};
pub use service::task_store::TaskStore;
pub use time::parse_due_date;
pub use view::{find_by_id_prefix, visible_tasks, SortKey, StatusFilter, TaskStats};
