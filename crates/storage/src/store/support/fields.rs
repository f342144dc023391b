#![forbid(unsafe_code)]

use super::super::StoreError;
use rusqlite::types::Value;
use rusqlite::{Transaction, params};
use tm_core::model::{FieldValue, Fields};

pub(in crate::store) fn field_to_sql(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Bool(value) => Value::Integer(i64::from(*value)),
        FieldValue::Integer(value) => Value::Integer(*value),
        FieldValue::Real(value) => Value::Real(*value),
        FieldValue::Text(value) => Value::Text(value.clone()),
    }
}

/// Decodes a `metadata_fields` row; `kind` keeps types SQLite would blur.
pub(in crate::store) fn field_from_sql(kind: &str, value: Value) -> Result<FieldValue, StoreError> {
    match (kind, value) {
        ("null", _) => Ok(FieldValue::Null),
        ("bool", Value::Integer(value)) => Ok(FieldValue::Bool(value != 0)),
        ("integer", Value::Integer(value)) => Ok(FieldValue::Integer(value)),
        ("real", Value::Real(value)) => Ok(FieldValue::Real(value)),
        // SQLite stores NaN as NULL.
        ("real", Value::Null) => Ok(FieldValue::Real(f64::NAN)),
        ("text", Value::Text(value)) => Ok(FieldValue::Text(value)),
        _ => Err(StoreError::InvalidInput("invalid metadata field row")),
    }
}

/// Upserts `fields` onto the record, leaving its other fields untouched.
pub(in crate::store) fn write_fields_tx(
    tx: &Transaction<'_>,
    metadata_id: i64,
    fields: &Fields,
) -> Result<(), StoreError> {
    let mut stmt = tx.prepare(
        r#"
        INSERT INTO metadata_fields(metadata_id, name, kind, value)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(metadata_id, name) DO UPDATE SET kind = excluded.kind, value = excluded.value
        "#,
    )?;
    for (name, value) in fields.iter() {
        stmt.execute(params![metadata_id, name, value.kind(), field_to_sql(value)])?;
    }
    Ok(())
}
