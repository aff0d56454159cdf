//! File system paths for the bot.

use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Name of the runtime directory under the home directory.
const BASE_DIR_NAME: &str = ".mikasa";

/// Manages file system paths for the bot.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for runtime files (~/.mikasa)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.mikasa`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(BASE_DIR_NAME),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.mikasa).
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the config file path (~/.mikasa/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the database file path (~/.mikasa/mikasa.sqlite).
    pub fn database_file(&self) -> PathBuf {
        self.base_dir.join("mikasa.sqlite")
    }

    /// Get the credentials file path (~/.mikasa/cred.txt).
    pub fn credentials_file(&self) -> PathBuf {
        self.base_dir.join("cred.txt")
    }

    /// Get the logs directory (~/.mikasa/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the JSONL log file path (~/.mikasa/logs/mikasa.jsonl).
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join("mikasa.jsonl")
    }

    /// Ensure the base and logs directories exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
