mod list;
mod logging;
mod tui;

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::Local;
use clap::Parser;
use log::warn;
use tasklist_core::{
    default_data_dir, find_by_id_prefix, visible_tasks, Config, FileTaskRepository, SortKey,
    StatusFilter, TaskDraft, TaskStats, TaskStore,
};

#[derive(Parser)]
#[command(name = "tasklist", version)]
#[command(about = "A single-user task list with an interactive terminal page", long_about = None)]
struct Cli {
    /// Directory holding tasks.json, config.toml and logs
    #[arg(long, global = true, env = "TASKLIST_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace); overrides config.toml
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a new task (usage: add Buy milk due:2025-01-01 pri:high)
    Add {
        /// Description words plus optional due:<date> and pri:<high|medium|low>
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// List tasks
    List {
        /// all, incomplete or completed
        #[arg(long, short)]
        filter: Option<StatusFilter>,
        /// created, priority or due
        #[arg(long, short)]
        sort: Option<SortKey>,
    },
    /// Change a task (usage: edit <id> New text due:none pri:low)
    Edit {
        /// Full id or unique prefix
        id: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// Mark a task completed
    Done { id: String },
    /// Mark a task not completed
    Undo { id: String },
    /// Delete a task
    Delete { id: String },
    /// Show pending/done counts
    Stats,
    /// Open the interactive page (default)
    Tui,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    let config = Config::load(&data_dir)?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let _logger = match logging::init_logging(level, &data_dir.join("logs")) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Warning: logging disabled: {:#}", err);
            None
        }
    };

    let store = TaskStore::new(FileTaskRepository::new(&data_dir)?);
    let today = Local::now().date_naive();

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Add { args } => {
            let (description, due_date, priority) =
                TaskDraft::from_args(&args, today)?.into_new_task()?;
            let tasks = store.add(store.load(), &description, due_date, priority)?;
            if let Some(task) = tasks.last() {
                println!("Task added: {} (ID: {})", task.description, task.short_id());
                if let Some(d) = task.due_date {
                    println!("  Due: {}", d.format("%Y-%m-%d"));
                }
                println!("  Priority: {}", task.priority);
            }
        }
        Commands::List { filter, sort } => {
            let tasks = store.load();
            let shown = visible_tasks(
                &tasks,
                filter.unwrap_or(config.default_filter),
                sort.unwrap_or(config.default_sort),
            );
            if shown.is_empty() {
                println!("No tasks found matching your criteria!");
            } else {
                println!("{}", list::render_table(&shown));
            }
            println!("{}", list::render_stats(&TaskStats::from_tasks(&tasks)));
        }
        Commands::Edit { id, args } => {
            let tasks = store.load();
            let id = find_by_id_prefix(&tasks, &id)?;
            let update = TaskDraft::from_args(&args, today)?.into_update();
            if update.is_empty() {
                bail!("Nothing to change");
            }
            let tasks = store.update(tasks, id, &update)?;
            if let Some(task) = tasks.iter().find(|t| t.id == id) {
                println!("Task updated: {} (ID: {})", task.description, task.short_id());
            }
        }
        Commands::Done { id } => set_completed(&store, &id, true)?,
        Commands::Undo { id } => set_completed(&store, &id, false)?,
        Commands::Delete { id } => {
            let tasks = store.load();
            let id = find_by_id_prefix(&tasks, &id)?;
            let remaining = store.delete(tasks, id)?;
            println!("Task deleted. {} remaining.", remaining.len());
        }
        Commands::Stats => {
            println!("{}", list::render_stats(&TaskStats::from_tasks(&store.load())));
        }
        Commands::Tui => {
            if let Err(err) = tui::run(store, config.default_filter, config.default_sort) {
                warn!("session aborted: {:#}", err);
                return Err(err);
            }
        }
    }
    Ok(())
}

fn set_completed(store: &TaskStore<FileTaskRepository>, id: &str, status: bool) -> Result<()> {
    let tasks = store.load();
    let id = find_by_id_prefix(&tasks, id)?;
    let tasks = store.toggle_completion(tasks, id, status)?;
    if let Some(task) = tasks.iter().find(|t| t.id == id) {
        let state = if status { "completed" } else { "reopened" };
        println!("Task {}: {}", state, task.description);
    }
    Ok(())
}
