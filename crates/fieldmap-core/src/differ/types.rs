//! Options, paths and summaries used by the differ

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Options for diff computation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Compare equal-length sequences index by index instead of replacing them wholesale
    pub compare_arrays_deeply: bool,

    /// Paths (as reported by `changed_paths`, e.g. `meta.updated_at` or `items[0].id`) that
    /// are never reported as changed
    pub ignore_paths: HashSet<String>,
}

impl DiffOptions {
    pub fn deep_arrays(mut self) -> Self {
        self.compare_arrays_deeply = true;
        self
    }

    pub fn ignore(mut self, path: impl Into<String>) -> Self {
        self.ignore_paths.insert(path.into());
        self
    }
}

/// One step of a path into a value tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Path from the root of a value tree
///
/// Displays in dot/bracket form: `contact.email`, `items[2].name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// True when the last step indexes into a sequence
    pub fn ends_in_index(&self) -> bool {
        matches!(self.segments.last(), Some(PathSegment::Index(_)))
    }

    /// Record keys used to address this path in a change tree; indices become string keys
    pub fn change_tree_keys(&self) -> Vec<String> {
        self.segments
            .iter()
            .map(|segment| match segment {
                PathSegment::Key(key) => key.clone(),
                PathSegment::Index(index) => index.to_string(),
            })
            .collect()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Counts of detected changes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Paths present only in the current tree
    pub added: usize,
    /// Paths present only in the original tree
    pub removed: usize,
    /// Paths present in both with different values
    pub modified: usize,
    /// Every changed path, in traversal order
    pub paths: Vec<String>,
}

impl DiffSummary {
    pub fn total(&self) -> usize {
        self.added + self.removed + self.modified
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
