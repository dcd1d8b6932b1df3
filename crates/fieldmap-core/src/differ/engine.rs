//! Recursive structural differ
//!
//! At each path the rules apply in priority order:
//! 1. ignored paths are skipped
//! 2. equal values (including absent/absent and null/null) produce nothing
//! 3. a change of kind replaces the entry with the current value
//! 4. sequences are replaced wholesale unless deep comparison is on and lengths match, in
//!    which case differing indices are reported individually
//! 5. records recurse into every current key and report keys only in the original as
//!    explicit removals
//! 6. anything else is a replacement
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use super::builder::ChangeTreeBuilder;
use super::types::{DiffOptions, DiffSummary, FieldPath, PathSegment};
use crate::value::Value;

/// Receives the changes found by a traversal
trait ChangeSink {
    fn changed(&mut self, path: &FieldPath, original: &Value, current: &Value);

    fn removed(&mut self, path: &FieldPath, original: &Value);

    /// Position to report a sequence at, taken before its elements are visited
    fn mark(&mut self) -> usize {
        0
    }

    /// Called after the elements of a deep-compared sequence when any of them changed
    fn sequence_changed(&mut self, _path: &FieldPath, _mark: usize) {}
}

struct TreeSink(ChangeTreeBuilder);

impl ChangeSink for TreeSink {
    fn changed(&mut self, path: &FieldPath, _original: &Value, current: &Value) {
        self.0.set(path, current.clone());
    }

    fn removed(&mut self, path: &FieldPath, _original: &Value) {
        self.0.remove(path);
    }
}

/// Reports a changed sequence once at its own path; element-level changes are only reported
/// from inside record elements
#[derive(Default)]
struct PathSink(Vec<String>);

impl PathSink {
    fn push(&mut self, path: &FieldPath) {
        if !path.ends_in_index() {
            self.0.push(path.to_string());
        }
    }
}

impl ChangeSink for PathSink {
    fn changed(&mut self, path: &FieldPath, _original: &Value, _current: &Value) {
        self.push(path);
    }

    fn removed(&mut self, path: &FieldPath, _original: &Value) {
        self.push(path);
    }

    fn mark(&mut self) -> usize {
        self.0.len()
    }

    fn sequence_changed(&mut self, path: &FieldPath, mark: usize) {
        self.0.insert(mark, path.to_string());
    }
}

#[derive(Default)]
struct SummarySink(DiffSummary);

impl ChangeSink for SummarySink {
    fn changed(&mut self, path: &FieldPath, original: &Value, current: &Value) {
        if original.is_absent() {
            self.0.added += 1;
        } else if current.is_absent() {
            self.0.removed += 1;
        } else {
            self.0.modified += 1;
        }
        self.0.paths.push(path.to_string());
    }

    fn removed(&mut self, path: &FieldPath, _original: &Value) {
        self.0.removed += 1;
        self.0.paths.push(path.to_string());
    }
}

struct NoopSink;

impl ChangeSink for NoopSink {
    fn changed(&mut self, _path: &FieldPath, _original: &Value, _current: &Value) {}

    fn removed(&mut self, _path: &FieldPath, _original: &Value) {}
}

/// Structural differ over value trees
#[derive(Debug, Clone, Default)]
pub struct Differ {
    options: DiffOptions,
}

impl Differ {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Change tree holding only what differs between `original` and `current`
    ///
    /// Removed keys appear with [`Value::Absent`]. Equal inputs produce an empty record.
    pub fn diff(&self, original: &Value, current: &Value) -> Value {
        let mut sink = TreeSink(ChangeTreeBuilder::new());
        let changed = self.walk(original, current, &mut FieldPath::root(), &mut sink);
        tracing::trace!(changed, "computed change tree");
        sink.0.finish()
    }

    /// Dot/bracket paths of everything that differs, including removals
    pub fn changed_paths(&self, original: &Value, current: &Value) -> Vec<String> {
        let mut sink = PathSink::default();
        self.walk(original, current, &mut FieldPath::root(), &mut sink);
        sink.0
    }

    /// Whether anything outside the ignored paths differs
    pub fn has_changes(&self, original: &Value, current: &Value) -> bool {
        self.walk(original, current, &mut FieldPath::root(), &mut NoopSink)
    }

    /// Whole-tree structural equality; key order and absent record entries do not matter
    pub fn is_equal(&self, original: &Value, current: &Value) -> bool {
        original == current
    }

    /// Counts of added, removed and modified entries with their paths
    ///
    /// Unlike [`Differ::changed_paths`], deep-compared sequence elements are counted
    /// individually.
    pub fn summarize(&self, original: &Value, current: &Value) -> DiffSummary {
        let mut sink = SummarySink::default();
        self.walk(original, current, &mut FieldPath::root(), &mut sink);
        sink.0
    }

    fn is_ignored(&self, path: &FieldPath) -> bool {
        !self.options.ignore_paths.is_empty()
            && self.options.ignore_paths.contains(&path.to_string())
    }

    fn walk(
        &self,
        original: &Value,
        current: &Value,
        path: &mut FieldPath,
        sink: &mut dyn ChangeSink,
    ) -> bool {
        if self.is_ignored(path) || original == current {
            return false;
        }
        if original.kind() != current.kind() {
            sink.changed(path, original, current);
            return true;
        }

        match (original, current) {
            (Value::Sequence(before), Value::Sequence(after)) => {
                if !self.options.compare_arrays_deeply || before.len() != after.len() {
                    sink.changed(path, original, current);
                    return true;
                }
                let mark = sink.mark();
                let mut changed = false;
                for (index, (b, a)) in before.iter().zip(after).enumerate() {
                    path.push(PathSegment::Index(index));
                    changed |= self.walk(b, a, path, sink);
                    path.pop();
                }
                if changed {
                    sink.sequence_changed(path, mark);
                }
                changed
            }
            (Value::Record(before), Value::Record(after)) => {
                let mut changed = false;
                for (key, a) in after {
                    path.push(PathSegment::Key(key.clone()));
                    changed |= self.walk(original.get(key), a, path, sink);
                    path.pop();
                }
                for (key, b) in before {
                    if after.contains_key(key) || b.is_absent() {
                        continue;
                    }
                    path.push(PathSegment::Key(key.clone()));
                    if !self.is_ignored(path) {
                        sink.removed(path, b);
                        changed = true;
                    }
                    path.pop();
                }
                changed
            }
            _ => {
                sink.changed(path, original, current);
                true
            }
        }
    }
}
