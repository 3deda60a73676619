use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::view::{SortKey, StatusFilter};

pub const CONFIG_FILE_NAME: &str = "config.toml";
const DATA_DIR_NAME: &str = ".tasklist";

/// User preferences read from `<data_dir>/config.toml`.
///
/// ```toml
/// default_filter = "incomplete"
/// default_sort = "due_date"
/// log_level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_filter: StatusFilter,
    pub default_sort: SortKey,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_filter: StatusFilter::default(),
            default_sort: SortKey::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Missing file means defaults; a malformed file is an error.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Config::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("Could not read {}", path.display()))
            }
        };
        toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }
}

/// `~/.tasklist`
pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(DATA_DIR_NAME))
}
