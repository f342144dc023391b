#![forbid(unsafe_code)]

use super::super::StoreError;
use super::super::support::{field_from_sql, record_id, task_id, where_clause};
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use std::ops::ControlFlow;
use tm_core::Criterion;
use tm_core::ids::RecordId;
use tm_core::model::{Fields, Metadata};

/// Streams matching records, one joined row per field, folding consecutive
/// rows of the same record. Dropping `rows` and `stmt` on return releases the
/// cursor on every path out of the loop.
pub(super) fn scan_metadata(
    conn: &Connection,
    criterion: &Criterion,
    visit: &mut dyn FnMut(Metadata) -> ControlFlow<()>,
) -> Result<(), StoreError> {
    let clause = where_clause(criterion);
    let sql = format!(
        r#"
        SELECT m.id, m.task, m.created_at_ms, f.name, f.kind, f.value
        FROM metadata m
        LEFT JOIN metadata_fields f ON f.metadata_id = m.id
        WHERE {}
        ORDER BY m.id ASC, f.name ASC
        "#,
        clause.sql
    );

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(clause.params.iter()))?;
    let mut current: Option<Metadata> = None;

    while let Some(row) = rows.next()? {
        let id = record_id(row.get::<_, i64>(0)?)?;
        if current.as_ref().and_then(Metadata::id) != Some(id) {
            if let Some(done) = current.take() {
                if visit(done).is_break() {
                    return Ok(());
                }
            }
            current = Some(Metadata::stored(
                id,
                task_id(row.get::<_, i64>(1)?)?,
                row.get::<_, i64>(2)?,
                Fields::new(),
            ));
        }

        let Some(name) = row.get::<_, Option<String>>(3)? else {
            continue;
        };
        let kind = row.get::<_, String>(4)?;
        let value = field_from_sql(&kind, row.get::<_, Value>(5)?)?;
        if let Some(record) = current.as_mut() {
            record.fields_mut().insert(name, value);
        }
    }

    if let Some(done) = current {
        let _ = visit(done);
    }
    Ok(())
}

pub(super) fn scan_dangling(
    conn: &Connection,
    visit: &mut dyn FnMut(RecordId) -> ControlFlow<()>,
) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        r#"
        SELECT m.id
        FROM metadata m
        LEFT JOIN tasks t ON t.id = m.task
        WHERE t.id IS NULL
        ORDER BY m.id ASC
        "#,
    )?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        if visit(record_id(row.get::<_, i64>(0)?)?).is_break() {
            break;
        }
    }
    Ok(())
}
