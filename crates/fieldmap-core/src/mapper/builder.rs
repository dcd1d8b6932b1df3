//! Fluent construction of a [`FieldMapper`]
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use super::config::{MapperConfig, MapperOptions};
use super::core::FieldMapper;
use crate::mapping::{InverseMapping, MappingTree};
use crate::transform::{Transform, TransformContext, TransformRegistry};
use crate::validator::Validator;
use crate::value::Value;
use crate::Result;
use std::sync::Arc;

/// Builder for [`FieldMapper`]
///
/// ```
/// use fieldmap_core::transform::built_in;
/// use fieldmap_core::{FieldMapper, MappingTree};
/// use serde_json::json;
///
/// let mapper = FieldMapper::builder(MappingTree::new().field("state", "status"))
///     .transform("status", built_in::enum_mapping([("A", "active")], None))
///     .defaults(json!({"status": "draft"}))
///     .omit_null(true)
///     .build()
///     .unwrap();
///
/// assert!(mapper.options().omit_null);
/// ```
#[derive(Debug)]
pub struct FieldMapperBuilder {
    config: MapperConfig,
}

impl FieldMapperBuilder {
    pub fn new(mapping: MappingTree) -> Self {
        Self {
            config: MapperConfig::new(mapping),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: MapperConfig) -> Self {
        Self { config }
    }

    /// Use an explicit inverse instead of deriving one
    pub fn inverse(mut self, inverse: InverseMapping) -> Self {
        self.config.inverse = Some(inverse);
        self
    }

    /// Register a transform for a target field
    pub fn transform<T>(mut self, field: impl Into<String>, transform: T) -> Self
    where
        T: Transform + 'static,
    {
        self.config.transforms.insert(field, transform);
        self
    }

    /// Register a closure transform for a target field
    pub fn transform_fn<F>(mut self, field: impl Into<String>, transform: F) -> Self
    where
        F: Fn(Value, &TransformContext<'_>) -> Value + Send + Sync + 'static,
    {
        self.config.transforms.insert_fn(field, transform);
        self
    }

    /// Add every transform of `transforms`, replacing existing ones for the same fields
    pub fn transforms(mut self, transforms: &TransformRegistry) -> Self {
        self.config.transforms = self.config.transforms.merged(transforms);
        self
    }

    pub fn defaults(mut self, defaults: impl Into<Value>) -> Self {
        self.config.defaults = defaults.into();
        self
    }

    pub fn validator<V>(mut self, validator: V) -> Self
    where
        V: Validator + 'static,
    {
        self.config.validator = Some(Arc::new(validator));
        self
    }

    /// Register a closure validator
    pub fn validator_fn<F>(self, validator: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<(), Vec<String>> + Send + Sync + 'static,
    {
        self.validator(validator)
    }

    pub fn options(mut self, options: MapperOptions) -> Self {
        self.config.options = options;
        self
    }

    pub fn type_coercion(mut self, enabled: bool) -> Self {
        self.config.options.type_coercion = enabled;
        self
    }

    pub fn omit_undefined(mut self, enabled: bool) -> Self {
        self.config.options.omit_undefined = enabled;
        self
    }

    pub fn omit_null(mut self, enabled: bool) -> Self {
        self.config.options.omit_null = enabled;
        self
    }

    pub fn compare_arrays_deeply(mut self, enabled: bool) -> Self {
        self.config.options.compare_arrays_deeply = enabled;
        self
    }

    /// Never report `path` (e.g. `meta.updated_at`) as changed
    pub fn ignore_path(mut self, path: impl Into<String>) -> Self {
        self.config.options.ignore_paths.insert(path.into());
        self
    }

    pub fn build(self) -> Result<FieldMapper> {
        FieldMapper::new(self.config)
    }
}
