//! Structural diffing of value trees
//!
//! - [`types`] - [`DiffOptions`], [`FieldPath`], [`DiffSummary`]
//! - [`builder`] - the change-tree accumulator
//! - [`engine`] - the recursive [`Differ`]
//!
//! The change tree mirrors the shape of the compared trees and holds only what differs.
//! Keys removed in the current tree appear with [`Value::Absent`] so a consumer can tell
//! "removed" from "not present in the diff".
//!
//! # Example
//!
//! ```
//! use fieldmap_core::differ::{changed_paths, diff, DiffOptions};
//! use fieldmap_core::Value;
//! use serde_json::json;
//!
//! let original = Value::from(json!({"a": 1, "b": 2}));
//! let current = Value::from(json!({"a": 1}));
//!
//! let tree = diff(&original, &current, &DiffOptions::default());
//! assert!(tree.get("b").is_absent());
//! assert_eq!(changed_paths(&original, &current, &DiffOptions::default()), vec!["b"]);
//! ```
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

pub mod builder;
pub mod engine;
pub mod types;


pub use builder::ChangeTreeBuilder;
pub use engine::Differ;
pub use types::{DiffOptions, DiffSummary, FieldPath, PathSegment};

use crate::value::Value;

/// Change tree between `original` and `current`
pub fn diff(original: &Value, current: &Value, options: &DiffOptions) -> Value {
    Differ::new(options.clone()).diff(original, current)
}

/// Paths that differ between `original` and `current`
pub fn changed_paths(original: &Value, current: &Value, options: &DiffOptions) -> Vec<String> {
    Differ::new(options.clone()).changed_paths(original, current)
}

pub fn has_changes(original: &Value, current: &Value, options: &DiffOptions) -> bool {
    Differ::new(options.clone()).has_changes(original, current)
}

pub fn is_equal(original: &Value, current: &Value) -> bool {
    original == current
}
