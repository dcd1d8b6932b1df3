//! Conversion between [`Value`] and `serde_json::Value`
//!
//! Import is lossless. Export follows the usual wire conventions: absent record entries are
//! dropped, absent sequence elements become `null`, and timestamps are written as RFC 3339
//! strings with millisecond precision.

use super::types::{Record, Value};
use chrono::SecondsFormat;
use serde_json::Map;

/// Export a value tree as JSON
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Absent | Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Value::Number(n.clone()),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::DateTime(dt) => {
            serde_json::Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        Value::Sequence(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Record(record) => {
            let object: Map<String, serde_json::Value> = record
                .iter()
                .filter(|(_, v)| v.is_present())
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect();
            serde_json::Value::Object(object)
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(object) => Value::Record(
                object
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Record>(),
            ),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        Value::from(value.clone())
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        to_json(&value)
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        to_json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_import_preserves_null_and_order() {
        let value = Value::from(json!({"b": null, "a": [1, "x"]}));
        let record = value.as_record().unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(record["b"].is_null());
    }

    #[test]
    fn test_export_drops_absent_entries() {
        let mut record = Record::new();
        record.insert("kept".to_string(), Value::Null);
        record.insert("gone".to_string(), Value::Absent);
        record.insert(
            "items".to_string(),
            Value::Sequence(vec![Value::Absent, Value::from(2)]),
        );

        assert_eq!(
            to_json(&Value::Record(record)),
            json!({"kept": null, "items": [null, 2]})
        );
    }

    #[test]
    fn test_export_datetime_as_rfc3339() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 0).unwrap();
        assert_eq!(
            to_json(&Value::DateTime(dt)),
            json!("2024-03-09T14:30:00.000Z")
        );
    }

    #[test]
    fn test_serde_round_trip_through_strings() {
        let value: Value = serde_json::from_str(r#"{"name":"ada","age":36}"#).unwrap();
        assert_eq!(value.get("age").as_i64(), Some(36));
        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"{"name":"ada","age":36}"#);
    }
}
