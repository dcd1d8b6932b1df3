//! Change-tree accumulator
//!
//! A builder is owned by exactly one `diff` call and never escapes it; the finished tree is
//! handed to the caller by value.

use super::types::FieldPath;
use crate::value::ops::set_segments;
use crate::value::Value;

/// Accumulates changes by path-addressed assignment
#[derive(Debug)]
pub struct ChangeTreeBuilder {
    tree: Value,
}

impl Default for ChangeTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeTreeBuilder {
    pub fn new() -> Self {
        Self {
            tree: Value::empty_record(),
        }
    }

    /// Record `value` at `path`
    ///
    /// At the root a record's keys are merged into the tree directly; any other root value
    /// replaces the tree. Elsewhere this behaves like `set_path`, with sequence indices
    /// written as record keys.
    pub fn set(&mut self, path: &FieldPath, value: Value) {
        if !path.is_root() {
            set_segments(&mut self.tree, &path.change_tree_keys(), value);
            return;
        }
        match value {
            Value::Record(top) if self.tree.is_record() => {
                if let Some(tree) = self.tree.as_record_mut() {
                    tree.extend(top);
                }
            }
            value => self.tree = value,
        }
    }

    /// Record an explicit removal
    pub fn remove(&mut self, path: &FieldPath) {
        self.set(path, Value::Absent);
    }

    pub fn finish(self) -> Value {
        self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differ::types::PathSegment;
    use serde_json::json;

    fn path(keys: &[&str]) -> FieldPath {
        let mut path = FieldPath::root();
        for key in keys {
            match key.parse::<usize>() {
                Ok(index) => path.push(PathSegment::Index(index)),
                Err(_) => path.push(PathSegment::Key(key.to_string())),
            }
        }
        path
    }

    #[test]
    fn test_nested_assignment() {
        let mut builder = ChangeTreeBuilder::new();
        builder.set(&path(&["contact", "email"]), Value::from("e2"));
        builder.remove(&path(&["legacy"]));

        let tree = builder.finish();
        assert_eq!(tree.get("contact").get("email"), &Value::from("e2"));
        assert!(tree.as_record().unwrap().contains_key("legacy"));
        assert!(tree.get("legacy").is_absent());
    }

    #[test]
    fn test_indices_become_keys() {
        let mut builder = ChangeTreeBuilder::new();
        builder.set(&path(&["items", "1", "name"]), Value::from("b"));
        assert_eq!(builder.finish(), Value::from(json!({"items": {"1": {"name": "b"}}})));
    }

    #[test]
    fn test_root_record_merges() {
        let mut builder = ChangeTreeBuilder::new();
        builder.set(&path(&["a"]), Value::from(1));
        builder.set(&FieldPath::root(), Value::from(json!({"b": 2})));
        assert_eq!(builder.finish(), Value::from(json!({"a": 1, "b": 2})));
    }

    #[test]
    fn test_root_scalar_replaces() {
        let mut builder = ChangeTreeBuilder::new();
        builder.set(&FieldPath::root(), Value::from(5));
        assert_eq!(builder.finish(), Value::from(5));
    }
}
