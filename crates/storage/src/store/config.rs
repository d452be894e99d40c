#![forbid(unsafe_code)]

use super::StoreError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DB_FILE_NAME: &str = "unitree.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

const ENV_STORAGE_DIR: &str = "UNITREE_STORAGE_DIR";
const ENV_DB_FILE: &str = "UNITREE_DB_FILE";
const ENV_BUSY_TIMEOUT_MS: &str = "UNITREE_BUSY_TIMEOUT_MS";

/// Where and how to open the tree database.
///
/// Deserializable so a host application can embed it in its own config file;
/// missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub storage_dir: PathBuf,
    pub db_file_name: String,
    /// How long a writer waits for the database lock before reporting
    /// `StoreError::Conflict`.
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("."),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl StoreConfig {
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `UNITREE_*` variables resolved through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StoreError> {
        let mut config = Self::default();
        if let Some(dir) = lookup(ENV_STORAGE_DIR).filter(|value| !value.trim().is_empty()) {
            config.storage_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup(ENV_DB_FILE).filter(|value| !value.trim().is_empty()) {
            config.db_file_name = file;
        }
        if let Some(timeout) = lookup(ENV_BUSY_TIMEOUT_MS) {
            config.busy_timeout_ms = timeout
                .trim()
                .parse::<u64>()
                .map_err(|_| StoreError::InvalidInput("UNITREE_BUSY_TIMEOUT_MS must be an integer"))?;
        }
        Ok(config)
    }

    pub fn db_path(&self) -> PathBuf {
        self.storage_dir.join(&self.db_file_name)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
