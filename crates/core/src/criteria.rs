#![forbid(unsafe_code)]

use crate::ids::{RecordId, TaskId};
use crate::model::{FieldValue, KEY_FIELD, Metadata};

/// Predicate over metadata records.
///
/// Stores translate it into their own query language; [`Criterion::matches`]
/// is the reference evaluation. Field comparisons are type-exact: integer `5`
/// does not match text `"5"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Criterion {
    All,
    Task(TaskId),
    Id(RecordId),
    FieldEq { name: String, value: FieldValue },
    HasField(String),
    And(Vec<Criterion>),
    Or(Vec<Criterion>),
    Not(Box<Criterion>),
}

impl Criterion {
    pub fn by_task(task: TaskId) -> Self {
        Self::Task(task)
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        let key: String = key.into();
        Self::field_eq(KEY_FIELD, key)
    }

    pub fn by_task_and_key(task: TaskId, key: impl Into<String>) -> Self {
        Self::by_task(task).and(Self::with_key(key))
    }

    pub fn field_eq(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::FieldEq {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn has_field(name: impl Into<String>) -> Self {
        Self::HasField(name.into())
    }

    pub fn and(self, other: Criterion) -> Self {
        match (self, other) {
            (Self::All, other) => other,
            (this, Self::All) => this,
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), other) => {
                left.push(other);
                Self::And(left)
            }
            (this, other) => Self::And(vec![this, other]),
        }
    }

    pub fn or(self, other: Criterion) -> Self {
        match (self, other) {
            (Self::Or(mut left), Self::Or(right)) => {
                left.extend(right);
                Self::Or(left)
            }
            (Self::Or(mut left), other) => {
                left.push(other);
                Self::Or(left)
            }
            (this, other) => Self::Or(vec![this, other]),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }

    pub fn matches(&self, record: &Metadata) -> bool {
        match self {
            Self::All => true,
            Self::Task(task) => record.task() == Some(*task),
            Self::Id(id) => record.id() == Some(*id),
            Self::FieldEq { name, value } => record.fields().get(name) == Some(value),
            Self::HasField(name) => record.fields().contains(name),
            Self::And(all) => all.iter().all(|c| c.matches(record)),
            Self::Or(any) => any.iter().any(|c| c.matches(record)),
            Self::Not(inner) => !inner.matches(record),
        }
    }
}
