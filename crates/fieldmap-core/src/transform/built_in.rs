//! Built-in transforms for common field conversions
//!
//! Each built-in is direction aware: conversions that have a natural inverse (enum lookups,
//! number/string, date formatting) undo themselves when denormalizing.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use super::types::{Transform, TransformContext, TransformDirection};
use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Pre-configured transform
///
/// Serializes as `{"type": "<name>", ...}` so configuration documents can declare
/// transforms by name:
///
/// ```json
/// {"type": "enum_mapping", "mappings": {"A": "active"}, "default": "unknown"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuiltInTransform {
    /// Strip surrounding whitespace from strings
    Trim,
    /// Lowercase strings
    Lowercase,
    /// Uppercase strings
    Uppercase,
    /// Look string values up in a table; reversed when denormalizing
    EnumMapping {
        mappings: IndexMap<String, String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
    /// Numbers become strings when normalizing, strings become numbers when denormalizing
    NumberToString,
    /// Strings become numbers when normalizing, numbers become strings when denormalizing
    StringToNumber,
    /// Timestamps are written with `format` when denormalizing and parsed with it when
    /// normalizing
    #[serde(rename = "format_datetime")]
    FormatDateTime { format: String },
    /// Replace absent or null values
    DefaultValue { value: Value },
}

impl BuiltInTransform {
    /// `type` tags accepted in declared form
    pub const NAMES: &'static [&'static str] = &[
        "trim",
        "lowercase",
        "uppercase",
        "enum_mapping",
        "number_to_string",
        "string_to_number",
        "format_datetime",
        "default_value",
    ];
}

impl Transform for BuiltInTransform {
    fn apply(&self, value: Value, context: &TransformContext<'_>) -> Value {
        let direction = context.direction;
        match self {
            BuiltInTransform::Trim => map_str(value, |s| s.trim().to_string()),
            BuiltInTransform::Lowercase => map_str(value, |s| s.to_lowercase()),
            BuiltInTransform::Uppercase => map_str(value, |s| s.to_uppercase()),
            BuiltInTransform::EnumMapping { mappings, default } => {
                apply_enum_mapping(value, mappings, default.as_deref(), direction)
            }
            BuiltInTransform::NumberToString => match direction {
                TransformDirection::Normalize => number_to_string(value),
                TransformDirection::Denormalize => string_to_number(value),
            },
            BuiltInTransform::StringToNumber => match direction {
                TransformDirection::Normalize => string_to_number(value),
                TransformDirection::Denormalize => number_to_string(value),
            },
            BuiltInTransform::FormatDateTime { format } => match direction {
                TransformDirection::Normalize => parse_datetime(value, format),
                TransformDirection::Denormalize => format_datetime(value, format),
            },
            BuiltInTransform::DefaultValue { value: fallback } => match value {
                Value::Absent | Value::Null => fallback.clone(),
                other => other,
            },
        }
    }

    fn name(&self) -> &str {
        match self {
            BuiltInTransform::Trim => "trim",
            BuiltInTransform::Lowercase => "lowercase",
            BuiltInTransform::Uppercase => "uppercase",
            BuiltInTransform::EnumMapping { .. } => "enum_mapping",
            BuiltInTransform::NumberToString => "number_to_string",
            BuiltInTransform::StringToNumber => "string_to_number",
            BuiltInTransform::FormatDateTime { .. } => "format_datetime",
            BuiltInTransform::DefaultValue { .. } => "default_value",
        }
    }

    fn describe(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }
}

fn map_str(value: Value, f: impl FnOnce(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(&s)),
        other => other,
    }
}

fn apply_enum_mapping(
    value: Value,
    mappings: &IndexMap<String, String>,
    default: Option<&str>,
    direction: TransformDirection,
) -> Value {
    let Value::String(key) = value else {
        return value;
    };
    let mapped = match direction {
        TransformDirection::Normalize => mappings.get(&key).cloned(),
        TransformDirection::Denormalize => mappings
            .iter()
            .find(|(_, to)| **to == key)
            .map(|(from, _)| from.clone()),
    };
    match (mapped, direction) {
        (Some(mapped), _) => Value::String(mapped),
        (None, TransformDirection::Normalize) => {
            Value::String(default.map_or(key, str::to_string))
        }
        (None, TransformDirection::Denormalize) => Value::String(key),
    }
}

fn number_to_string(value: Value) -> Value {
    match value {
        Value::Number(n) => Value::String(n.to_string()),
        other => other,
    }
}

fn string_to_number(value: Value) -> Value {
    match value {
        Value::String(s) => match crate::normalizer::coercion::parse_number(s.trim()) {
            Some(n) => Value::Number(n),
            None => Value::String(s),
        },
        other => other,
    }
}

fn format_datetime(value: Value, format: &str) -> Value {
    match value {
        // Invalid specifiers surface as a formatting error; keep the timestamp as it was
        Value::DateTime(dt) => {
            let mut out = String::new();
            match write!(out, "{}", dt.format(format)) {
                Ok(()) => Value::String(out),
                Err(_) => Value::DateTime(dt),
            }
        }
        other => other,
    }
}

fn parse_datetime(value: Value, format: &str) -> Value {
    let Value::String(s) = value else {
        return value;
    };
    if let Ok(naive) = NaiveDateTime::parse_from_str(&s, format) {
        return Value::DateTime(Utc.from_utc_datetime(&naive));
    }
    if let Some(midnight) = NaiveDate::parse_from_str(&s, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Value::DateTime(Utc.from_utc_datetime(&midnight));
    }
    Value::String(s)
}

/// Strip surrounding whitespace
pub fn trim() -> BuiltInTransform {
    BuiltInTransform::Trim
}

/// Lowercase strings
pub fn lowercase() -> BuiltInTransform {
    BuiltInTransform::Lowercase
}

/// Uppercase strings
pub fn uppercase() -> BuiltInTransform {
    BuiltInTransform::Uppercase
}

/// Map enum values using a lookup table
pub fn enum_mapping<I, K, V>(pairs: I, default: Option<&str>) -> BuiltInTransform
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    BuiltInTransform::EnumMapping {
        mappings: pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect(),
        default: default.map(str::to_string),
    }
}

/// Create a number to string conversion
pub fn number_to_string_transform() -> BuiltInTransform {
    BuiltInTransform::NumberToString
}

/// Create a string to number conversion
pub fn string_to_number_transform() -> BuiltInTransform {
    BuiltInTransform::StringToNumber
}

/// Format timestamps with a chrono format string
pub fn format_datetime_with(format: impl Into<String>) -> BuiltInTransform {
    BuiltInTransform::FormatDateTime {
        format: format.into(),
    }
}

/// Create a default value injection
pub fn default_value(value: impl Into<Value>) -> BuiltInTransform {
    BuiltInTransform::DefaultValue {
        value: value.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ctx(direction: TransformDirection) -> TransformContext<'static> {
        static SCOPE: Value = Value::Absent;
        TransformContext {
            direction,
            field: "field",
            source_path: "field",
            scope: &SCOPE,
        }
    }

    const N: TransformDirection = TransformDirection::Normalize;
    const D: TransformDirection = TransformDirection::Denormalize;

    #[test]
    fn test_string_transforms_ignore_other_kinds() {
        assert_eq!(trim().apply(Value::from("  ada "), &ctx(N)), Value::from("ada"));
        assert_eq!(lowercase().apply(Value::from("ADA"), &ctx(D)), Value::from("ada"));
        assert_eq!(uppercase().apply(Value::from("ada"), &ctx(N)), Value::from("ADA"));
        assert_eq!(trim().apply(Value::from(3), &ctx(N)), Value::from(3));
    }

    #[test]
    fn test_enum_mapping_both_directions() {
        let status = enum_mapping([("A", "active"), ("I", "inactive")], Some("unknown"));

        assert_eq!(status.apply(Value::from("A"), &ctx(N)), Value::from("active"));
        assert_eq!(status.apply(Value::from("Z"), &ctx(N)), Value::from("unknown"));
        assert_eq!(status.apply(Value::from("inactive"), &ctx(D)), Value::from("I"));
        assert_eq!(status.apply(Value::from("unknown"), &ctx(D)), Value::from("unknown"));
        assert_eq!(status.apply(Value::Null, &ctx(N)), Value::Null);
    }

    #[test]
    fn test_number_string_conversions_invert() {
        let t = number_to_string_transform();
        assert_eq!(t.apply(Value::from(42), &ctx(N)), Value::from("42"));
        assert_eq!(t.apply(Value::from("42"), &ctx(D)), Value::from(42));

        let t = string_to_number_transform();
        assert_eq!(t.apply(Value::from(" 2.5 "), &ctx(N)), Value::from(2.5));
        assert_eq!(t.apply(Value::from("n/a"), &ctx(N)), Value::from("n/a"));
        assert_eq!(t.apply(Value::from(7), &ctx(D)), Value::from("7"));
    }

    #[test]
    fn test_format_datetime() {
        let t = format_datetime_with("%Y-%m-%d");
        let dt = Utc.with_ymd_and_hms(2024, 5, 17, 0, 0, 0).unwrap();

        assert_eq!(t.apply(Value::DateTime(dt), &ctx(D)), Value::from("2024-05-17"));
        assert_eq!(t.apply(Value::from("2024-05-17"), &ctx(N)), Value::DateTime(dt));
        assert_eq!(t.apply(Value::from("yesterday"), &ctx(N)), Value::from("yesterday"));
    }

    #[test]
    fn test_format_datetime_with_invalid_specifier_keeps_timestamp() {
        let t = format_datetime_with("%Q");
        let dt = Utc.with_ymd_and_hms(2024, 5, 17, 0, 0, 0).unwrap();

        assert_eq!(t.apply(Value::DateTime(dt), &ctx(D)), Value::DateTime(dt));
    }

    #[test]
    fn test_default_value() {
        let t = default_value("n/a");
        assert_eq!(t.apply(Value::Absent, &ctx(N)), Value::from("n/a"));
        assert_eq!(t.apply(Value::Null, &ctx(D)), Value::from("n/a"));
        assert_eq!(t.apply(Value::from("set"), &ctx(N)), Value::from("set"));
    }

    #[test]
    fn test_names() {
        assert_eq!(trim().name(), "trim");
        assert_eq!(format_datetime_with("%F").name(), "format_datetime");
        assert_eq!(default_value(1).name(), "default_value");
    }

    #[test]
    fn test_declared_form() {
        let status: BuiltInTransform = serde_json::from_value(serde_json::json!({
            "type": "enum_mapping",
            "mappings": {"A": "active"}
        }))
        .unwrap();
        assert_eq!(status, enum_mapping([("A", "active")], None));

        let fallback: BuiltInTransform =
            serde_json::from_value(serde_json::json!({"type": "default_value", "value": "n/a"})).unwrap();
        assert_eq!(fallback, default_value("n/a"));

        assert_eq!(
            format_datetime_with("%Y").describe(),
            Some(serde_json::json!({"type": "format_datetime", "format": "%Y"}))
        );
        let dated: BuiltInTransform =
            serde_json::from_value(serde_json::json!({"type": "format_datetime", "format": "%F"})).unwrap();
        assert_eq!(dated, format_datetime_with("%F"));
        for name in BuiltInTransform::NAMES {
            assert!(
                serde_json::from_value::<BuiltInTransform>(serde_json::json!({"type": name}))
                    .map_or_else(|err| !err.to_string().contains("unknown variant"), |_| true),
                "declared name '{}' is not recognised",
                name
            );
        }
        assert!(serde_json::from_value::<BuiltInTransform>(serde_json::json!({"type": "rot13"})).is_err());
    }
}
