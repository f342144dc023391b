#![forbid(unsafe_code)]

use super::support::task_id;
use super::{SqliteStore, StoreError};
use rusqlite::{OptionalExtension, params};
use tm_core::ids::TaskId;
use tm_core::time::now_ms;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRow {
    pub id: TaskId,
    pub title: String,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl SqliteStore {
    pub fn create_task(&mut self, title: &str) -> Result<TaskId, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::InvalidInput("task title must not be empty"));
        }

        let now_ms = now_ms();
        self.conn.execute(
            "INSERT INTO tasks(title, created_at_ms, updated_at_ms) VALUES (?1, ?2, ?3)",
            params![title, now_ms, now_ms],
        )?;
        task_id(self.conn.last_insert_rowid())
    }

    pub fn get_task(&self, id: TaskId) -> Result<Option<TaskRow>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, title, created_at_ms, updated_at_ms FROM tasks WHERE id = ?1",
                params![id.get()],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((id, title, created_at_ms, updated_at_ms)) => Ok(Some(TaskRow {
                id: task_id(id)?,
                title,
                created_at_ms,
                updated_at_ms,
            })),
            None => Ok(None),
        }
    }

    /// Removes the task row only. Its metadata stays behind as dangling
    /// records until the next cleanup sweep.
    pub fn delete_task(&mut self, id: TaskId) -> Result<bool, StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id.get()])?;
        Ok(deleted > 0)
    }
}
