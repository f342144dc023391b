#![forbid(unsafe_code)]

use serde::Deserialize;
use std::time::Duration;

const DEFAULT_DB_FILE_NAME: &str = "task_metadata.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Connection settings for [`SqliteStore`](super::SqliteStore).
///
/// Every field has a default, so an empty table deserializes to
/// `StoreConfig::default()`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file created inside the storage directory.
    pub db_file_name: String,
    pub busy_timeout_ms: u64,
    /// Write-ahead logging. Ignored for in-memory stores.
    pub wal: bool,
}

impl StoreConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            wal: true,
        }
    }
}
