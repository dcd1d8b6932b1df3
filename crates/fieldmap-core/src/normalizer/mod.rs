//! Source-to-target conversion driven by a mapping tree
//!
//! The normalizer walks the mapping tree in lock-step with the source record. Fields it cannot
//! reach (missing keys, a scalar where a record was expected, a record where a sequence was
//! expected) are skipped rather than reported.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

pub mod coercion;

use crate::mapping::{MappingNode, MappingTree};
use crate::transform::{apply_optional, TransformContext, TransformDirection, TransformRegistry};
use crate::value::{join_path, set_path, Value};

pub use coercion::coerce;

/// Options for [`normalize`]
#[derive(Debug, Clone, Copy)]
pub struct NormalizeOptions<'a> {
    /// Coerce numeric, boolean and date-time strings
    pub type_coercion: bool,
    /// Record the output starts from; mapped values are written over it
    pub defaults: Option<&'a Value>,
    pub transforms: Option<&'a TransformRegistry>,
}

impl Default for NormalizeOptions<'_> {
    fn default() -> Self {
        Self {
            type_coercion: true,
            defaults: None,
            transforms: None,
        }
    }
}

impl<'a> NormalizeOptions<'a> {
    pub fn with_defaults(mut self, defaults: &'a Value) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn with_transforms(mut self, transforms: &'a TransformRegistry) -> Self {
        self.transforms = Some(transforms);
        self
    }

    pub fn without_coercion(mut self) -> Self {
        self.type_coercion = false;
        self
    }
}

/// Convert source-schema data into target-schema data
///
/// # Example
///
/// ```
/// use fieldmap_core::normalizer::{normalize, NormalizeOptions};
/// use fieldmap_core::{MappingTree, Value};
/// use serde_json::json;
///
/// let mapping = MappingTree::from_json(&json!({
///     "user_name": "username",
///     "contact": { "email_address": "email" }
/// })).unwrap();
/// let source = Value::from(json!({"user_name": "j", "contact": {"email_address": "e"}}));
///
/// let target = normalize(&source, &mapping, &NormalizeOptions::default());
/// assert_eq!(target.to_json(), json!({"username": "j", "email": "e"}));
/// ```
pub fn normalize(source: &Value, mapping: &MappingTree, options: &NormalizeOptions<'_>) -> Value {
    let mut output = match options.defaults {
        Some(defaults @ Value::Record(_)) => defaults.clone(),
        _ => Value::empty_record(),
    };
    normalize_into(source, mapping, "", options, &mut output);
    output
}

fn normalize_into(
    source: &Value,
    mapping: &MappingTree,
    prefix: &str,
    options: &NormalizeOptions<'_>,
    output: &mut Value,
) {
    for (key, node) in mapping {
        let value = source.get(key);
        let source_path = join_path(prefix, key);
        match node {
            MappingNode::Field(target) => {
                let context = TransformContext {
                    direction: TransformDirection::Normalize,
                    field: target,
                    source_path: &source_path,
                    scope: source,
                };
                let mut mapped = apply_optional(options.transforms, value.clone(), &context);
                if options.type_coercion && mapped.is_present() {
                    mapped = coerce(mapped);
                }
                if mapped.is_present() {
                    set_path(output, target, mapped);
                }
            }
            MappingNode::Nested(sub) => {
                if value.is_record() {
                    normalize_into(value, sub, &source_path, options, output);
                }
            }
            MappingNode::Repeated(sub) => {
                if let Value::Sequence(items) = value {
                    let element_options = NormalizeOptions {
                        defaults: None,
                        ..*options
                    };
                    let mapped = items
                        .iter()
                        .map(|item| match item {
                            Value::Record(_) => normalize(item, sub, &element_options),
                            other => other.clone(),
                        })
                        .collect();
                    set_path(output, key, Value::Sequence(mapped));
                }
            }
        }
    }
}
