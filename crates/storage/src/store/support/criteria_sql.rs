#![forbid(unsafe_code)]

use super::fields::field_to_sql;
use rusqlite::types::Value;
use tm_core::Criterion;

/// SQL condition over the `metadata` table aliased as `m`, with positional params.
#[derive(Clone, Debug, Default)]
pub(in crate::store) struct WhereClause {
    pub(in crate::store) sql: String,
    pub(in crate::store) params: Vec<Value>,
}

pub(in crate::store) fn where_clause(criterion: &Criterion) -> WhereClause {
    let mut out = WhereClause::default();
    push_criterion(&mut out, criterion);
    out
}

fn push_criterion(out: &mut WhereClause, criterion: &Criterion) {
    match criterion {
        Criterion::All => out.sql.push('1'),
        Criterion::Task(task) => {
            out.sql.push_str("m.task = ?");
            out.params.push(Value::Integer(task.get()));
        }
        Criterion::Id(id) => {
            out.sql.push_str("m.id = ?");
            out.params.push(Value::Integer(id.get()));
        }
        Criterion::FieldEq { name, value } => {
            out.sql.push_str(
                "EXISTS (SELECT 1 FROM metadata_fields c \
                 WHERE c.metadata_id = m.id AND c.name = ? AND c.kind = ? AND c.value IS ?)",
            );
            out.params.push(Value::Text(name.clone()));
            out.params.push(Value::Text(value.kind().to_string()));
            out.params.push(field_to_sql(value));
        }
        Criterion::HasField(name) => {
            out.sql.push_str(
                "EXISTS (SELECT 1 FROM metadata_fields c WHERE c.metadata_id = m.id AND c.name = ?)",
            );
            out.params.push(Value::Text(name.clone()));
        }
        Criterion::And(parts) => push_joined(out, parts, " AND ", '1'),
        Criterion::Or(parts) => push_joined(out, parts, " OR ", '0'),
        Criterion::Not(inner) => {
            out.sql.push_str("NOT (");
            push_criterion(out, inner);
            out.sql.push(')');
        }
    }
}

fn push_joined(out: &mut WhereClause, parts: &[Criterion], separator: &str, empty: char) {
    if parts.is_empty() {
        out.sql.push(empty);
        return;
    }
    out.sql.push('(');
    for (index, part) in parts.iter().enumerate() {
        if index > 0 {
            out.sql.push_str(separator);
        }
        push_criterion(out, part);
    }
    out.sql.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_core::ids::TaskId;

    #[test]
    fn compiles_nested_criteria_with_params_in_order() {
        let task = TaskId::try_new(7).unwrap();
        let clause = where_clause(
            &Criterion::by_task_and_key(task, "due").and(Criterion::has_field("value2").not()),
        );

        assert_eq!(
            clause.sql,
            "(m.task = ? AND EXISTS (SELECT 1 FROM metadata_fields c \
             WHERE c.metadata_id = m.id AND c.name = ? AND c.kind = ? AND c.value IS ?) \
             AND NOT (EXISTS (SELECT 1 FROM metadata_fields c WHERE c.metadata_id = m.id AND c.name = ?)))"
        );
        assert_eq!(
            clause.params,
            vec![
                Value::Integer(7),
                Value::Text("key".to_string()),
                Value::Text("text".to_string()),
                Value::Text("due".to_string()),
                Value::Text("value2".to_string()),
            ]
        );
    }

    #[test]
    fn empty_junctions_are_constants() {
        assert_eq!(where_clause(&Criterion::And(Vec::new())).sql, "1");
        assert_eq!(where_clause(&Criterion::Or(Vec::new())).sql, "0");
    }
}
