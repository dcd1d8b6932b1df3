//! Type coercion heuristics for string values
//!
//! Tried in order, first match wins:
//! 1. strict numeric string → number (integers stay integral)
//! 2. exactly `"true"` / `"false"` → boolean
//! 3. ISO-8601 date-time prefix that parses to a valid timestamp → date-time
//! 4. anything else is returned unchanged
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use crate::value::Value;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde_json::Number;
use std::sync::OnceLock;

static NUMERIC: OnceLock<Regex> = OnceLock::new();
static DATETIME_PREFIX: OnceLock<Regex> = OnceLock::new();

fn numeric_pattern() -> &'static Regex {
    NUMERIC.get_or_init(|| {
        Regex::new(r"^-?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$").expect("numeric pattern is valid")
    })
}

fn datetime_prefix_pattern() -> &'static Regex {
    DATETIME_PREFIX.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}").expect("date-time pattern is valid")
    })
}

/// Coerce a value; only strings are ever changed
pub fn coerce(value: Value) -> Value {
    match value {
        Value::String(s) => coerce_str(s),
        other => other,
    }
}

fn coerce_str(s: String) -> Value {
    if let Some(number) = parse_number(&s) {
        return Value::Number(number);
    }
    match s.as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Some(dt) = parse_iso_datetime(&s) {
        return Value::DateTime(dt);
    }
    Value::String(s)
}

/// Parse a strict decimal numeric string
///
/// No surrounding whitespace, no hex, no `NaN`/`Infinity`. Integers that fit in 64 bits stay
/// integral; anything else must be a finite float.
pub fn parse_number(s: &str) -> Option<Number> {
    if !numeric_pattern().is_match(s) {
        return None;
    }
    let integral = !s.contains(['.', 'e', 'E']);
    if integral {
        if let Ok(i) = s.parse::<i64>() {
            return Some(Number::from(i));
        }
        if let Ok(u) = s.parse::<u64>() {
            return Some(Number::from(u));
        }
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Parse an ISO-8601 date-time, defaulting to UTC when no offset is given
pub fn parse_iso_datetime(s: &str) -> Option<DateTime<Utc>> {
    if !datetime_prefix_pattern().is_match(s) {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_strings() {
        assert_eq!(coerce(Value::from("42")), Value::from(42));
        assert_eq!(coerce(Value::from("-7")), Value::from(-7));
        assert_eq!(coerce(Value::from("3.25")), Value::from(3.25));
        assert_eq!(coerce(Value::from("1e3")), Value::from(1000.0));
        assert_eq!(coerce(Value::from(".5")), Value::from(0.5));
        assert_eq!(coerce(Value::from("18446744073709551615")), Value::from(u64::MAX));
    }

    #[test]
    fn test_non_strict_numbers_stay_strings() {
        for s in ["", " 42", "42 ", "0x1F", "NaN", "Infinity", "1,000", "12abc", "-", "1e999"] {
            assert_eq!(coerce(Value::from(s)), Value::from(s), "input {:?}", s);
        }
    }

    #[test]
    fn test_booleans_are_exact() {
        assert_eq!(coerce(Value::from("true")), Value::Bool(true));
        assert_eq!(coerce(Value::from("false")), Value::Bool(false));
        assert_eq!(coerce(Value::from("True")), Value::from("True"));
        assert_eq!(coerce(Value::from("yes")), Value::from("yes"));
    }

    #[test]
    fn test_datetimes() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();

        assert_eq!(coerce(Value::from("2024-01-15T10:30:00Z")), Value::DateTime(expected));
        assert_eq!(coerce(Value::from("2024-01-15T12:30:00+02:00")), Value::DateTime(expected));
        assert_eq!(coerce(Value::from("2024-01-15T10:30:00")), Value::DateTime(expected));
        assert_eq!(coerce(Value::from("2024-01-15T10:30")), Value::DateTime(expected));
        assert_eq!(coerce(Value::from("2024-01-15T10:30:00+0000")), Value::DateTime(expected));
    }

    #[test]
    fn test_invalid_or_partial_dates_stay_strings() {
        for s in ["2024-13-45T99:99:00Z", "2024-01-15", "15/01/2024 10:30", "2024-01-15T10:30 and more"] {
            assert_eq!(coerce(Value::from(s)), Value::from(s), "input {:?}", s);
        }
    }

    #[test]
    fn test_non_strings_untouched() {
        assert_eq!(coerce(Value::from(5)), Value::from(5));
        assert_eq!(coerce(Value::Null), Value::Null);
        assert_eq!(coerce(Value::Bool(false)), Value::Bool(false));
    }
}
