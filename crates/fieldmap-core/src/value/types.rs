//! The value tree shared by every fieldmap component
//!
//! A [`Value`] is a JSON-like tree extended with two things JSON cannot say: an explicit
//! [`Value::Absent`] marker ("carries no information") that is distinct from `Null`, and a
//! native [`Value::DateTime`] produced by type coercion.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// Insertion-ordered record body
pub type Record = IndexMap<String, Value>;

/// Shared absence marker handed out by lookups that find nothing
pub(crate) static ABSENT: Value = Value::Absent;

/// A node in a value tree
///
/// Equality is structural. Records compare without regard to key order, and an entry holding
/// [`Value::Absent`] equals a missing key. Numbers compare by value, so `1` equals `1.0`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    /// No information; omitted by default wherever it would be written
    #[default]
    Absent,
    /// Explicitly empty
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Timestamp produced by coercing ISO-8601 strings
    DateTime(DateTime<Utc>),
    Sequence(Vec<Value>),
    Record(Record),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Absent, Value::Absent) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => records_equal(a, b),
            _ => false,
        }
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if a == b {
        return true;
    }
    // integers are compared exactly; only a float on either side widens to f64
    if !(a.is_f64() || b.is_f64()) {
        return false;
    }
    matches!((a.as_f64(), b.as_f64()), (Some(x), Some(y)) if x == y)
}

fn records_equal(a: &Record, b: &Record) -> bool {
    let present = |record: &Record| record.values().filter(|value| value.is_present()).count();
    present(a) == present(b)
        && a
            .iter()
            .filter(|(_, value)| value.is_present())
            .all(|(key, value)| b.get(key).map_or(false, |other| other == value))
}

/// Coarse kind of a value, used by the differ to detect shape changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Absent,
    Null,
    Bool,
    Number,
    String,
    DateTime,
    Sequence,
    Record,
}

impl Value {
    /// A new empty record
    pub fn empty_record() -> Self {
        Value::Record(Record::new())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Absent => ValueKind::Absent,
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Sequence(_) => ValueKind::Sequence,
            Value::Record(_) => ValueKind::Record,
        }
    }

    /// True for records, never for sequences, null or absent
    pub fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Anything but [`Value::Absent`]; `Null` counts as present
    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    /// True for a record without keys
    pub fn is_empty_record(&self) -> bool {
        matches!(self, Value::Record(record) if record.is_empty())
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Look up a direct child of a record
    ///
    /// Returns [`Value::Absent`] when the key is missing or `self` is not a record.
    pub fn get(&self, key: &str) -> &Value {
        match self {
            Value::Record(record) => record.get(key).unwrap_or(&ABSENT),
            _ => &ABSENT,
        }
    }

    /// Export as `serde_json::Value`, see [`crate::value::json`] for the rules
    pub fn to_json(&self) -> serde_json::Value {
        super::json::to_json(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "<absent>"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(value.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no numeric representation and become `Null`
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Sequence(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Record(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    /// `None` maps to `Null`, not to `Absent`
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Value::Record(iter.into_iter().collect())
    }
}
