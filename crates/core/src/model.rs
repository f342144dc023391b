#![forbid(unsafe_code)]

use crate::ids::{RecordId, TaskId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// Conventional field naming the kind of a metadata record.
pub const KEY_FIELD: &str = "key";

/// Fields starting with this prefix compare by their string form.
pub const VALUE_FIELD_PREFIX: &str = "value";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl FieldValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// String form used for `value*` fields. Null has none and stays null.
    pub fn stringified(&self) -> FieldValue {
        match self {
            Self::Null => Self::Null,
            Self::Bool(value) => Self::Text(value.to_string()),
            Self::Integer(value) => Self::Text(value.to_string()),
            Self::Real(value) => Self::Text(value.to_string()),
            Self::Text(value) => Self::Text(value.clone()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Integer(_) => 2,
            Self::Real(_) => 3,
            Self::Text(_) => 4,
        }
    }
}

/// Folds every NaN onto one bit pattern; SQLite cannot keep the NaN payload.
fn canonical_real(value: f64) -> f64 {
    if value.is_nan() {
        f64::NAN
    } else {
        value
    }
}

// Reals compare with `total_cmp` after NaN folding, so any two NaNs are equal.
impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Real(a), Self::Real(b)) => canonical_real(*a).total_cmp(&canonical_real(*b)),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FieldValue {}

impl Hash for FieldValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Null => {}
            Self::Bool(value) => value.hash(state),
            Self::Integer(value) => value.hash(state),
            Self::Real(value) => canonical_real(*value).to_bits().hash(state),
            Self::Text(value) => value.hash(state),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Named payload of a metadata record, ordered by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, FieldValue>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.0.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of these fields with every `value*` entry in string form.
    pub fn normalized(&self) -> Fields {
        Fields(
            self.0
                .iter()
                .map(|(name, value)| {
                    let value = if name.starts_with(VALUE_FIELD_PREFIX) {
                        value.stringified()
                    } else {
                        value.clone()
                    };
                    (name.clone(), value)
                })
                .collect(),
        )
    }

    /// Copies every entry of `other` over this mapping.
    pub fn merge(&mut self, other: &Fields) {
        for (name, value) in &other.0 {
            self.0.insert(name.clone(), value.clone());
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self.0))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Fields(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A metadata record attached to a task.
///
/// `id` and `created_at_ms` are bookkeeping owned by the store: callers never
/// set the id, and neither participates in reconciliation equality.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    id: Option<RecordId>,
    task: Option<TaskId>,
    created_at_ms: Option<i64>,
    fields: Fields,
}

impl Metadata {
    pub fn new(task: TaskId) -> Self {
        Self {
            task: Some(task),
            ..Self::default()
        }
    }

    /// A record that is not attached to any task yet.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Rebuilds a persisted record. Meant for store adapters.
    pub fn stored(id: RecordId, task: TaskId, created_at_ms: i64, fields: Fields) -> Self {
        Self {
            id: Some(id),
            task: Some(task),
            created_at_ms: Some(created_at_ms),
            fields,
        }
    }

    pub fn with_key(self, key: impl Into<String>) -> Self {
        let key: String = key.into();
        self.with_field(KEY_FIELD, key)
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name, value);
        self
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_created_at_ms(mut self, created_at_ms: i64) -> Self {
        self.created_at_ms = Some(created_at_ms);
        self
    }

    pub fn id(&self) -> Option<RecordId> {
        self.id
    }

    pub fn task(&self) -> Option<TaskId> {
        self.task
    }

    pub fn set_task(&mut self, task: TaskId) {
        self.task = Some(task);
    }

    pub fn created_at_ms(&self) -> Option<i64> {
        self.created_at_ms
    }

    pub fn key(&self) -> Option<&str> {
        self.fields.get(KEY_FIELD).and_then(FieldValue::as_str)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Payload used for reconciliation equality.
    pub fn normalized_fields(&self) -> Fields {
        self.fields.normalized()
    }

    pub(crate) fn clear_identity(&mut self) {
        self.id = None;
        self.created_at_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_fields_normalize_to_text() {
        let fields = Fields::new()
            .with("key", "alarm")
            .with("value", 5)
            .with("value2", 2.5)
            .with("value3", true)
            .with("value4", FieldValue::Null)
            .with("count", 5);
        let normalized = fields.normalized();

        assert_eq!(normalized.get("key"), Some(&FieldValue::from("alarm")));
        assert_eq!(normalized.get("value"), Some(&FieldValue::from("5")));
        assert_eq!(normalized.get("value2"), Some(&FieldValue::from("2.5")));
        assert_eq!(normalized.get("value3"), Some(&FieldValue::from("true")));
        assert_eq!(normalized.get("value4"), Some(&FieldValue::Null));
        assert_eq!(normalized.get("count"), Some(&FieldValue::Integer(5)));
    }

    #[test]
    fn integer_and_text_values_are_equivalent_after_normalization() {
        let a = Metadata::detached().with_key("due").with_field("value", 5);
        let b = Metadata::detached().with_key("due").with_field("value", "5");
        assert_ne!(a.fields(), b.fields());
        assert_eq!(a.normalized_fields(), b.normalized_fields());
    }

    #[test]
    fn identity_is_not_part_of_normalized_fields() {
        let task = TaskId::try_new(3).unwrap();
        let id = RecordId::try_new(9).unwrap();
        let stored = Metadata::stored(id, task, 1_000, Fields::new().with("key", "note"));
        let fresh = Metadata::new(task).with_key("note");
        assert_eq!(stored.normalized_fields(), fresh.normalized_fields());
        assert_ne!(stored, fresh);
    }

    #[test]
    fn field_value_order_is_total() {
        assert_eq!(FieldValue::Real(f64::NAN), FieldValue::Real(f64::NAN));
        assert_ne!(FieldValue::Integer(5), FieldValue::Real(5.0));
        assert!(FieldValue::Null < FieldValue::Text(String::new()));
    }

    #[test]
    fn nan_values_are_equal_regardless_of_sign() {
        use std::collections::hash_map::DefaultHasher;

        let negative = FieldValue::Real(-f64::NAN);
        let positive = FieldValue::Real(f64::NAN);
        assert_eq!(negative, positive);
        assert!(FieldValue::Real(f64::INFINITY) < negative);

        let hash = |value: &FieldValue| {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(&negative), hash(&positive));
    }

    #[test]
    fn whole_reals_stringify_without_fraction() {
        let real = Fields::new().with("key", "alarm").with("value", 5.0);
        let integer = Fields::new().with("key", "alarm").with("value", 5);

        assert_eq!(real.normalized().get("value"), Some(&FieldValue::from("5")));
        assert_eq!(real.normalized(), integer.normalized());
    }

    #[test]
    fn fields_render_as_json_object() {
        let fields = Fields::new().with("key", "tag").with("value", 1);
        assert_eq!(fields.to_json(), r#"{"key":"tag","value":1}"#);
    }
}
