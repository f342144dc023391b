#![forbid(unsafe_code)]

mod config;
mod error;
mod metadata;
mod support;
mod tasks;

pub use config::StoreConfig;
pub use error::StoreError;
pub use tasks::TaskRow;

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use support::install_schema;
use tracing::debug;

/// SQLite-backed store for tasks and the metadata attached to them.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: Option<PathBuf>,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with(storage_dir, &StoreConfig::default())
    }

    pub fn open_with(
        storage_dir: impl AsRef<Path>,
        config: &StoreConfig,
    ) -> Result<Self, StoreError> {
        if config.db_file_name.trim().is_empty() {
            return Err(StoreError::InvalidInput("db_file_name must not be empty"));
        }

        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(&config.db_file_name);
        let conn = Connection::open(&db_path)?;
        configure_connection(&conn, config, true)?;
        install_schema(&conn)?;

        debug!(path = %db_path.display(), wal = config.wal, "opened metadata store");
        Ok(Self {
            conn,
            storage_dir: Some(storage_dir),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        configure_connection(&conn, &StoreConfig::default(), false)?;
        install_schema(&conn)?;
        Ok(Self {
            conn,
            storage_dir: None,
        })
    }

    /// `None` for in-memory stores.
    pub fn storage_dir(&self) -> Option<&Path> {
        self.storage_dir.as_deref()
    }
}

fn configure_connection(
    conn: &Connection,
    config: &StoreConfig,
    on_disk: bool,
) -> Result<(), StoreError> {
    conn.busy_timeout(config.busy_timeout())?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    if on_disk && config.wal {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            "#,
        )?;
    }
    Ok(())
}
