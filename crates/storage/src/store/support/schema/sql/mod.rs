#![forbid(unsafe_code)]

mod core;
mod indexes;
mod metadata;
mod tasks;

pub(super) fn full_schema_sql() -> String {
    let mut sql = String::new();
    sql.push_str(core::SQL);
    sql.push_str(tasks::SQL);
    sql.push_str(metadata::SQL);
    sql.push_str(indexes::SQL);
    sql
}
