//! Derivation of the target-to-source inverse of a mapping tree
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use super::types::{InverseMapping, InverseTarget, MappingNode, MappingTree};
use crate::value::join_path;
use std::borrow::Cow;

/// Invert a mapping tree
///
/// Every leaf `key -> target` reached under source prefix `P` becomes `target -> P.key`.
/// A repeated node at `key` becomes `key -> Repeated { path: P.key, .. }` with its own
/// element inverse. Traversal follows declaration order, so a later leaf naming the same
/// target overwrites an earlier one.
pub fn invert_mapping(tree: &MappingTree) -> InverseMapping {
    let mut inverse = InverseMapping::new();
    invert_into(tree, "", &mut inverse);
    inverse
}

fn invert_into(tree: &MappingTree, prefix: &str, inverse: &mut InverseMapping) {
    for (key, node) in tree {
        let source_path = join_path(prefix, key);
        match node {
            MappingNode::Field(target) => {
                inverse.insert(target.clone(), InverseTarget::Path(source_path));
            }
            MappingNode::Nested(sub) => invert_into(sub, &source_path, inverse),
            MappingNode::Repeated(sub) => {
                inverse.insert(
                    key.clone(),
                    InverseTarget::Repeated {
                        path: source_path,
                        elements: invert_mapping(sub),
                    },
                );
            }
        }
    }
}

/// Either side of a mapping, accepted wherever an inverse is needed
#[derive(Debug, Clone, Copy)]
pub enum MappingRef<'a> {
    Forward(&'a MappingTree),
    Inverse(&'a InverseMapping),
}

impl<'a> MappingRef<'a> {
    /// The inverse mapping, derived on the fly for a forward tree
    pub fn to_inverse(self) -> Cow<'a, InverseMapping> {
        match self {
            MappingRef::Forward(tree) => Cow::Owned(invert_mapping(tree)),
            MappingRef::Inverse(inverse) => Cow::Borrowed(inverse),
        }
    }
}

impl<'a> From<&'a MappingTree> for MappingRef<'a> {
    fn from(tree: &'a MappingTree) -> Self {
        MappingRef::Forward(tree)
    }
}

impl<'a> From<&'a InverseMapping> for MappingRef<'a> {
    fn from(inverse: &'a InverseMapping) -> Self {
        MappingRef::Inverse(inverse)
    }
}
