#![forbid(unsafe_code)]

use super::super::StoreError;
use super::super::support::{record_id, where_clause, write_fields_tx};
use rusqlite::{Connection, OptionalExtension, Transaction, params, params_from_iter};
use tm_core::Criterion;
use tm_core::ids::RecordId;
use tm_core::model::{Fields, Metadata};
use tm_core::time::now_ms;

pub(super) fn persist_tx(tx: &Transaction<'_>, record: &Metadata) -> Result<Metadata, StoreError> {
    let task = record
        .task()
        .ok_or(StoreError::InvalidInput("metadata needs to be attached to a task"))?;

    let Some(id) = record.id() else {
        let created_at_ms = record.created_at_ms().unwrap_or_else(now_ms);
        tx.execute(
            "INSERT INTO metadata(task, created_at_ms) VALUES (?1, ?2)",
            params![task.get(), created_at_ms],
        )?;
        let id = record_id(tx.last_insert_rowid())?;
        write_fields_tx(tx, id.get(), record.fields())?;
        return Ok(Metadata::stored(
            id,
            task,
            created_at_ms,
            record.fields().clone(),
        ));
    };

    let stored_created_at_ms = tx
        .query_row(
            "SELECT created_at_ms FROM metadata WHERE id = ?1",
            params![id.get()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .ok_or(StoreError::UnknownId)?;
    let created_at_ms = record.created_at_ms().unwrap_or(stored_created_at_ms);

    tx.execute(
        "UPDATE metadata SET task = ?2, created_at_ms = ?3 WHERE id = ?1",
        params![id.get(), task.get(), created_at_ms],
    )?;
    tx.execute(
        "DELETE FROM metadata_fields WHERE metadata_id = ?1",
        params![id.get()],
    )?;
    write_fields_tx(tx, id.get(), record.fields())?;

    Ok(Metadata::stored(
        id,
        task,
        created_at_ms,
        record.fields().clone(),
    ))
}

pub(super) fn delete_by_id(conn: &Connection, id: RecordId) -> Result<bool, StoreError> {
    let deleted = conn.execute("DELETE FROM metadata WHERE id = ?1", params![id.get()])?;
    Ok(deleted > 0)
}

pub(super) fn delete_where(conn: &Connection, criterion: &Criterion) -> Result<usize, StoreError> {
    let clause = where_clause(criterion);
    let sql = format!(
        "DELETE FROM metadata WHERE id IN (SELECT m.id FROM metadata m WHERE {})",
        clause.sql
    );
    Ok(conn.execute(&sql, params_from_iter(clause.params.iter()))?)
}

pub(super) fn update_where_tx(
    tx: &Transaction<'_>,
    criterion: &Criterion,
    values: &Fields,
) -> Result<usize, StoreError> {
    let clause = where_clause(criterion);
    let ids = {
        let sql = format!("SELECT m.id FROM metadata m WHERE {}", clause.sql);
        let mut stmt = tx.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(clause.params.iter()), |row| {
            row.get::<_, i64>(0)
        })?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    for id in ids.iter() {
        write_fields_tx(tx, *id, values)?;
    }
    Ok(ids.len())
}
