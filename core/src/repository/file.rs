use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use tempfile::NamedTempFile;

use crate::model::task::Task;
use crate::repository::traits::TaskRepository;

pub const DEFAULT_FILE_NAME: &str = "tasks.json";

#[derive(Clone, Debug)]
pub struct FileTaskRepository {
    file_path: PathBuf,
}

impl FileTaskRepository {
    /// Stores tasks in `<data_dir>/tasks.json`, creating `data_dir` if needed.
    /// The file itself is only written on the first save.
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Could not create data directory {}", data_dir.display()))?;
        Ok(Self::at(data_dir.join(DEFAULT_FILE_NAME)))
    }

    pub fn at(file_path: PathBuf) -> Self {
        FileTaskRepository { file_path }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_tasks(&self) -> Result<Vec<Task>> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let tasks = serde_json::from_reader(reader)?;
        Ok(tasks)
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        replace_contents(&self.file_path, |w| {
            serde_json::to_writer_pretty(&mut *w, tasks)?;
            w.write_all(b"\n")?;
            Ok(())
        })
    }
}

/// Writes into a scratch file next to `path` and renames it over `path`,
/// so readers see either the old contents or the new ones.
fn replace_contents<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Could not create a scratch file in {}", dir.display()))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        fill(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Could not write {}", path.display()))?;
    Ok(())
}

impl TaskRepository for FileTaskRepository {
    fn load(&self) -> Vec<Task> {
        match self.read_tasks() {
            Ok(tasks) => {
                debug!("loaded {} tasks from {}", tasks.len(), self.file_path.display());
                tasks
            }
            Err(err) => {
                let missing = err
                    .downcast_ref::<std::io::Error>()
                    .is_some_and(|e| e.kind() == ErrorKind::NotFound);
                if missing {
                    debug!("{} does not exist yet", self.file_path.display());
                } else {
                    warn!(
                        "ignoring unreadable task file {}: {:#}",
                        self.file_path.display(),
                        err
                    );
                }
                Vec::new()
            }
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        self.write_tasks(tasks)?;
        debug!("saved {} tasks to {}", tasks.len(), self.file_path.display());
        Ok(())
    }
}
