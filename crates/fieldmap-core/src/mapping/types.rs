//! Mapping trees and their inverse
//!
//! A [`MappingTree`] is authored from the point of view of the submission (source) schema:
//! each key is a source field, each node says where that field lives in the retrieval
//! (target) schema. In JSON form a node is a string (target field name), an object (nested
//! record) or a one-element array wrapping an object (per-element mapping of a sequence).
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result};
use indexmap::map::Iter;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One node of a mapping tree, resolved once when the tree is loaded
#[derive(Debug, Clone, PartialEq)]
pub enum MappingNode {
    /// Leaf: the target field name (a dotted path in the target schema)
    Field(String),
    /// Nested record in the source schema
    Nested(MappingTree),
    /// Sequence in the source schema whose elements are mapped with the inner tree
    Repeated(MappingTree),
}

/// Source-to-target field mapping
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub struct MappingTree {
    entries: IndexMap<String, MappingNode>,
}

impl MappingTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leaf mapping `source_key -> target`
    pub fn field(mut self, source_key: impl Into<String>, target: impl Into<String>) -> Self {
        self.entries
            .insert(source_key.into(), MappingNode::Field(target.into()));
        self
    }

    /// Add a nested record mapping
    pub fn nested(mut self, source_key: impl Into<String>, tree: MappingTree) -> Self {
        self.entries
            .insert(source_key.into(), MappingNode::Nested(tree));
        self
    }

    /// Add a per-element sequence mapping
    pub fn repeated(mut self, source_key: impl Into<String>, tree: MappingTree) -> Self {
        self.entries
            .insert(source_key.into(), MappingNode::Repeated(tree));
        self
    }

    pub fn insert(&mut self, source_key: impl Into<String>, node: MappingNode) -> Option<MappingNode> {
        self.entries.insert(source_key.into(), node)
    }

    pub fn get(&self, source_key: &str) -> Option<&MappingNode> {
        self.entries.get(source_key)
    }

    pub fn iter(&self) -> Iter<'_, String, MappingNode> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the JSON authoring form
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        parse_tree(json, "")
    }

    /// Export to the JSON authoring form
    pub fn to_json(&self) -> serde_json::Value {
        let object = self
            .entries
            .iter()
            .map(|(key, node)| {
                let json = match node {
                    MappingNode::Field(target) => serde_json::Value::String(target.clone()),
                    MappingNode::Nested(tree) => tree.to_json(),
                    MappingNode::Repeated(tree) => serde_json::Value::Array(vec![tree.to_json()]),
                };
                (key.clone(), json)
            })
            .collect();
        serde_json::Value::Object(object)
    }

    /// Dotted source paths of every leaf, in declaration order
    ///
    /// Leaves under a repeated node are reported relative to the sequence field, e.g.
    /// `line_items.sku`.
    pub fn source_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_leaves("", &mut |path, _| paths.push(path.to_string()));
        paths
    }

    /// Target field names of every leaf, in declaration order
    pub fn target_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_leaves("", &mut |_, target| names.push(target.to_string()));
        names
    }

    /// Target names claimed by more than one leaf at the same level of inversion
    ///
    /// These collide in the inverse mapping: the last declaration wins.
    pub fn duplicate_targets(&self) -> Vec<String> {
        let mut duplicates = Vec::new();
        self.find_duplicates(&mut duplicates);
        duplicates
    }

    fn find_duplicates(&self, duplicates: &mut Vec<String>) {
        let targets = self.scope_targets();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for target in &targets {
            *counts.entry(target.as_str()).or_default() += 1;
        }
        for target in &targets {
            if counts[target.as_str()] > 1 && !duplicates.contains(target) {
                duplicates.push(target.clone());
            }
        }
        self.for_each_repeated(&mut |tree| tree.find_duplicates(duplicates));
    }

    /// Visit the inner tree of every repeated node reachable without crossing another one
    fn for_each_repeated(&self, visit: &mut dyn FnMut(&MappingTree)) {
        for node in self.entries.values() {
            match node {
                MappingNode::Nested(tree) => tree.for_each_repeated(visit),
                MappingNode::Repeated(tree) => visit(tree),
                MappingNode::Field(_) => {}
            }
        }
    }

    /// Targets that land in one inverse scope: leaves of this tree and of nested trees,
    /// plus the keys of repeated fields
    fn collect_scope_targets(&self, visit: &mut dyn FnMut(&str)) {
        for (key, node) in &self.entries {
            match node {
                MappingNode::Field(target) => visit(target),
                MappingNode::Nested(tree) => tree.collect_scope_targets(visit),
                MappingNode::Repeated(_) => visit(key),
            }
        }
    }

    fn scope_targets(&self) -> Vec<String> {
        let mut targets = Vec::new();
        self.collect_scope_targets(&mut |target| targets.push(target.to_string()));
        targets
    }

    fn collect_leaves(&self, prefix: &str, visit: &mut dyn FnMut(&str, &str)) {
        for (key, node) in &self.entries {
            let path = crate::value::join_path(prefix, key);
            match node {
                MappingNode::Field(target) => visit(&path, target),
                MappingNode::Nested(tree) | MappingNode::Repeated(tree) => {
                    tree.collect_leaves(&path, visit)
                }
            }
        }
    }

    /// Deep-merge `other` over this tree
    ///
    /// Nested nodes on both sides merge recursively; any other pairing is replaced by the
    /// node from `other`.
    pub fn merge(&self, other: &MappingTree) -> MappingTree {
        let mut merged = self.clone();
        for (key, incoming) in &other.entries {
            let next = match (merged.entries.get(key), incoming) {
                (Some(MappingNode::Nested(base)), MappingNode::Nested(overlay)) => {
                    MappingNode::Nested(base.merge(overlay))
                }
                (Some(MappingNode::Repeated(base)), MappingNode::Repeated(overlay)) => {
                    MappingNode::Repeated(base.merge(overlay))
                }
                _ => incoming.clone(),
            };
            merged.entries.insert(key.clone(), next);
        }
        merged
    }
}

impl<'a> IntoIterator for &'a MappingTree {
    type Item = (&'a String, &'a MappingNode);
    type IntoIter = Iter<'a, String, MappingNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl TryFrom<serde_json::Value> for MappingTree {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        MappingTree::from_json(&value)
    }
}

impl From<MappingTree> for serde_json::Value {
    fn from(tree: MappingTree) -> Self {
        tree.to_json()
    }
}

fn parse_tree(json: &serde_json::Value, at: &str) -> Result<MappingTree> {
    let object = json.as_object().ok_or_else(|| {
        Error::configuration(format!(
            "mapping at '{}' must be an object, found {}",
            display_at(at),
            json_kind(json)
        ))
    })?;

    let mut tree = MappingTree::new();
    for (key, node) in object {
        let path = crate::value::join_path(at, key);
        let node = match node {
            serde_json::Value::String(target) if !target.is_empty() => {
                MappingNode::Field(target.clone())
            }
            serde_json::Value::Object(_) => MappingNode::Nested(parse_tree(node, &path)?),
            serde_json::Value::Array(items) if items.len() == 1 => {
                MappingNode::Repeated(parse_tree(&items[0], &format!("{}[0]", path))?)
            }
            serde_json::Value::Array(items) => {
                return Err(Error::configuration(format!(
                    "sequence mapping at '{}' must wrap exactly one tree, found {} elements",
                    path,
                    items.len()
                )))
            }
            other => {
                return Err(Error::configuration(format!(
                    "mapping at '{}' must be a target name, object or one-element array, found {}",
                    path,
                    json_kind(other)
                )))
            }
        };
        tree.entries.insert(key.clone(), node);
    }
    Ok(tree)
}

fn display_at(at: &str) -> &str {
    if at.is_empty() {
        "<root>"
    } else {
        at
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(s) if s.is_empty() => "empty string",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Where one target field comes from in the source schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InverseTarget {
    /// Dotted source path
    Path(String),
    /// Sequence at a dotted source path, elements mapped through their own inverse
    Repeated {
        path: String,
        elements: InverseMapping,
    },
}

impl InverseTarget {
    pub fn source_path(&self) -> &str {
        match self {
            InverseTarget::Path(path) => path,
            InverseTarget::Repeated { path, .. } => path,
        }
    }
}

/// Target-path to source-path mapping derived from a [`MappingTree`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InverseMapping {
    entries: IndexMap<String, InverseTarget>,
}

impl InverseMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; an existing entry for the same target is overwritten
    pub fn insert(&mut self, target: impl Into<String>, source: InverseTarget) -> Option<InverseTarget> {
        self.entries.insert(target.into(), source)
    }

    pub fn get(&self, target: &str) -> Option<&InverseTarget> {
        self.entries.get(target)
    }

    pub fn iter(&self) -> Iter<'_, String, InverseTarget> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of `other` replace entries for the same target
    pub fn merge(&self, other: &InverseMapping) -> InverseMapping {
        let mut merged = self.clone();
        for (target, source) in &other.entries {
            merged.entries.insert(target.clone(), source.clone());
        }
        merged
    }
}

impl<'a> IntoIterator for &'a InverseMapping {
    type Item = (&'a String, &'a InverseTarget);
    type IntoIter = Iter<'a, String, InverseTarget>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
