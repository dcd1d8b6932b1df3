//! Core types for per-field transforms
//!
//! Transforms are registered under a target field name and run in both directions: while
//! normalizing (after the source value is read, before coercion) and while denormalizing
//! (after omission rules, before the value is written back to its source path).
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Direction a transform is being applied in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformDirection {
    /// Submission schema to retrieval schema
    Normalize,
    /// Retrieval schema back to submission schema
    Denormalize,
}

/// Context information available to transforms
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    pub direction: TransformDirection,
    /// Target field name the transform is registered under
    pub field: &'a str,
    /// Source-schema path of the field
    pub source_path: &'a str,
    /// The enclosing source record while normalizing, the whole target record while
    /// denormalizing
    pub scope: &'a Value,
}

/// A pure value transform
pub trait Transform: Send + Sync {
    fn apply(&self, value: Value, context: &TransformContext<'_>) -> Value;

    /// Name used in diagnostics
    fn name(&self) -> &str {
        "custom"
    }

    /// Declarative form for configuration export; `None` for code-only transforms
    fn describe(&self) -> Option<serde_json::Value> {
        None
    }
}

impl<F> Transform for F
where
    F: Fn(Value, &TransformContext<'_>) -> Value + Send + Sync,
{
    fn apply(&self, value: Value, context: &TransformContext<'_>) -> Value {
        self(value, context)
    }
}

/// Transforms keyed by target field name
#[derive(Clone, Default)]
pub struct TransformRegistry {
    transforms: IndexMap<String, Arc<dyn Transform>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transform, replacing any previous one for the same field
    pub fn insert<T>(&mut self, field: impl Into<String>, transform: T)
    where
        T: Transform + 'static,
    {
        self.transforms.insert(field.into(), Arc::new(transform));
    }

    /// Register a closure
    pub fn insert_fn<F>(&mut self, field: impl Into<String>, transform: F)
    where
        F: Fn(Value, &TransformContext<'_>) -> Value + Send + Sync + 'static,
    {
        self.insert(field, transform);
    }

    /// Builder form of [`TransformRegistry::insert`]
    pub fn with<T>(mut self, field: impl Into<String>, transform: T) -> Self
    where
        T: Transform + 'static,
    {
        self.insert(field, transform);
        self
    }

    pub(crate) fn insert_shared(&mut self, field: impl Into<String>, transform: Arc<dyn Transform>) {
        self.transforms.insert(field.into(), transform);
    }

    pub fn get(&self, field: &str) -> Option<&dyn Transform> {
        self.transforms.get(field).map(|t| t.as_ref())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.transforms.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.transforms.keys().map(String::as_str)
    }

    /// Run the transform registered for `context.field`, or return the value unchanged
    pub fn apply(&self, value: Value, context: &TransformContext<'_>) -> Value {
        match self.transforms.get(context.field) {
            Some(transform) => {
                tracing::trace!(
                    field = context.field,
                    transform = transform.name(),
                    direction = ?context.direction,
                    "applying field transform"
                );
                transform.apply(value, context)
            }
            None => value,
        }
    }

    /// Declarative forms of the registered transforms
    ///
    /// Closures and other code-only transforms have no declarative form and are left out.
    pub fn describe(&self) -> IndexMap<String, serde_json::Value> {
        self.transforms
            .iter()
            .filter_map(|(field, transform)| transform.describe().map(|json| (field.clone(), json)))
            .collect()
    }

    /// Entries of `other` replace entries for the same field
    pub fn merged(&self, other: &TransformRegistry) -> TransformRegistry {
        let mut merged = self.clone();
        for (field, transform) in &other.transforms {
            merged.insert_shared(field.clone(), Arc::clone(transform));
        }
        merged
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.transforms.iter().map(|(k, t)| (k, t.name())))
            .finish()
    }
}

/// Run an optional registry, the common case inside the engine
pub(crate) fn apply_optional(
    registry: Option<&TransformRegistry>,
    value: Value,
    context: &TransformContext<'_>,
) -> Value {
    match registry {
        Some(registry) => registry.apply(value, context),
        None => value,
    }
}
