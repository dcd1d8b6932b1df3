//! Path-addressed operations over value trees
//!
//! Paths are dot-separated record keys (`contact.email`). The empty path addresses the
//! tree itself.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use super::types::{Record, Value, ABSENT};
use indexmap::IndexMap;

/// True iff `value` is a record (not a sequence, null or absent)
pub fn is_record(value: &Value) -> bool {
    value.is_record()
}

/// Join a parent path and a key with a dot, omitting the dot at the root
pub fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Read the value at a dotted path
///
/// Returns [`Value::Absent`] if any segment is missing or an intermediate is not a record.
pub fn get_path<'a>(tree: &'a Value, path: &str) -> &'a Value {
    if path.is_empty() {
        return tree;
    }

    let mut current = tree;
    for segment in path.split('.') {
        match current {
            Value::Record(record) => match record.get(segment) {
                Some(next) => current = next,
                None => return &ABSENT,
            },
            _ => return &ABSENT,
        }
    }
    current
}

/// Write `value` at a dotted path, creating intermediate records as needed
///
/// Any intermediate that is not a record (including the tree itself) is replaced by an empty
/// record, discarding what was there. The empty path replaces the whole tree.
pub fn set_path(tree: &mut Value, path: &str, value: Value) {
    if path.is_empty() {
        *tree = value;
        return;
    }
    let segments: Vec<&str> = path.split('.').collect();
    set_segments(tree, &segments, value);
}

/// Segment-wise form of [`set_path`], used where keys may themselves contain dots
pub(crate) fn set_segments<S: AsRef<str>>(tree: &mut Value, segments: &[S], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        *tree = value;
        return;
    };

    let mut current = tree;
    for segment in parents {
        let Some(record) = ensure_record(current) else {
            return;
        };
        current = record
            .entry(segment.as_ref().to_string())
            .or_insert_with(Value::empty_record);
    }
    if let Some(record) = ensure_record(current) {
        record.insert(last.as_ref().to_string(), value);
    }
}

/// Replace a non-record with an empty record and hand back its body
fn ensure_record(value: &mut Value) -> Option<&mut Record> {
    if !value.is_record() {
        *value = Value::empty_record();
    }
    value.as_record_mut()
}

/// Merge `source` over `target` into a new value
///
/// Recursion happens only where both sides hold a record at the same key; anywhere else the
/// source value replaces the target value wholesale, including record-to-scalar.
pub fn deep_merge(target: &Value, source: &Value) -> Value {
    match (target, source) {
        (Value::Record(base), Value::Record(overlay)) => {
            let mut merged = base.clone();
            for (key, incoming) in overlay {
                let next = match merged.get(key) {
                    Some(existing) if existing.is_record() && incoming.is_record() => {
                        deep_merge(existing, incoming)
                    }
                    _ => incoming.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Record(merged)
        }
        _ => source.clone(),
    }
}

/// Flatten nested records into dotted paths
///
/// Sequences and empty records are kept as opaque leaves. A non-record root is returned under
/// the empty path; an absent root flattens to nothing.
pub fn flatten(tree: &Value) -> IndexMap<String, Value> {
    let mut flat = IndexMap::new();
    match tree {
        Value::Record(record) => flatten_into(record, "", &mut flat),
        Value::Absent => {}
        other => {
            flat.insert(String::new(), other.clone());
        }
    }
    flat
}

fn flatten_into(record: &Record, prefix: &str, flat: &mut IndexMap<String, Value>) {
    for (key, value) in record {
        let path = join_path(prefix, key);
        match value {
            Value::Record(inner) if !inner.is_empty() => flatten_into(inner, &path, flat),
            other => {
                flat.insert(path, other.clone());
            }
        }
    }
}

/// Rebuild a tree from dotted paths produced by [`flatten`]
pub fn unflatten(flat: &IndexMap<String, Value>) -> Value {
    let mut tree = Value::empty_record();
    for (path, value) in flat {
        set_path(&mut tree, path, value.clone());
    }
    tree
}
