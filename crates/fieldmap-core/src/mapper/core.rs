//! The [`FieldMapper`] handle
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use super::builder::FieldMapperBuilder;
use super::config::{ConfigOverrides, MapperConfig, MapperOptions};
use crate::denormalizer::{denormalize, DenormalizeOptions};
use crate::differ::{DiffSummary, Differ};
use crate::mapping::{invert_mapping, InverseMapping, MappingTree};
use crate::normalizer::{normalize, NormalizeOptions};
use crate::payload::{self, PayloadOptions};
use crate::value::Value;
use crate::{Error, Result};
use std::fmt;
use std::sync::Arc;

struct MapperInner {
    config: MapperConfig,
    inverse: InverseMapping,
    differ: Differ,
}

/// One frozen mapping configuration and every operation over it
///
/// Cloning is cheap and clones share the configuration. The handle is `Send + Sync`.
///
/// # Example
///
/// ```
/// use fieldmap_core::{FieldMapper, MappingTree, Value};
/// use serde_json::json;
///
/// let mapper = FieldMapper::builder(
///     MappingTree::from_json(&json!({
///         "user_name": "username",
///         "contact": { "email_address": "email" }
///     }))
///     .unwrap(),
/// )
/// .build()
/// .unwrap();
///
/// let loaded = mapper.normalize(&Value::from(json!({
///     "user_name": "j",
///     "contact": { "email_address": "e" }
/// })));
/// assert_eq!(loaded.to_json(), json!({"username": "j", "email": "e"}));
///
/// let mut edited = loaded.clone();
/// fieldmap_core::set_path(&mut edited, "email", Value::from("e2"));
/// let patch = mapper.build_patch(&loaded, &edited).unwrap().unwrap();
/// assert_eq!(patch.to_json(), json!({"contact": {"email_address": "e2"}}));
/// ```
#[derive(Clone)]
pub struct FieldMapper {
    inner: Arc<MapperInner>,
}

impl FieldMapper {
    /// Freeze `config` into a mapper
    ///
    /// Fails when the mapping tree is empty or the defaults are not a record. Target names
    /// claimed by more than one leaf are logged; the last declaration wins.
    pub fn new(config: MapperConfig) -> Result<Self> {
        if config.mapping.is_empty() {
            return Err(Error::configuration("mapping tree is missing or empty"));
        }
        if !matches!(config.defaults, Value::Record(_) | Value::Absent | Value::Null) {
            return Err(Error::configuration(format!(
                "defaults must be a record, found {:?}",
                config.defaults.kind()
            )));
        }
        for target in config.mapping.duplicate_targets() {
            log::warn!(
                "Target field '{}' is mapped more than once; the last declaration wins",
                target
            );
        }

        let inverse = match &config.inverse {
            Some(inverse) => inverse.clone(),
            None => invert_mapping(&config.mapping),
        };
        let differ = Differ::new(config.options.diff_options());
        tracing::debug!(
            fields = config.mapping.len(),
            inverse_fields = inverse.len(),
            transforms = config.transforms.len(),
            "field mapper ready"
        );

        Ok(Self {
            inner: Arc::new(MapperInner {
                config,
                inverse,
                differ,
            }),
        })
    }

    pub fn builder(mapping: MappingTree) -> FieldMapperBuilder {
        FieldMapperBuilder::new(mapping)
    }

    /// Build a mapper from a JSON configuration document
    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::new(MapperConfig::from_json_str(text)?)
    }

    pub fn mapping(&self) -> &MappingTree {
        &self.inner.config.mapping
    }

    /// The inverse in use, explicit or derived
    pub fn inverse(&self) -> &InverseMapping {
        &self.inner.inverse
    }

    pub fn options(&self) -> &MapperOptions {
        &self.inner.config.options
    }

    pub fn defaults(&self) -> &Value {
        &self.inner.config.defaults
    }

    /// Convert source-schema data into target-schema data
    pub fn normalize(&self, source: &Value) -> Value {
        let config = &self.inner.config;
        let options = NormalizeOptions {
            type_coercion: config.options.type_coercion,
            defaults: Some(&config.defaults),
            transforms: Some(&config.transforms),
        };
        normalize(source, &config.mapping, &options)
    }

    /// Convert target-schema data back to source shape using the configured omission rules
    pub fn denormalize(&self, target: &Value) -> Value {
        denormalize(target, &self.inner.inverse, &self.denormalize_options())
    }

    pub fn diff(&self, original: &Value, current: &Value) -> Value {
        self.inner.differ.diff(original, current)
    }

    pub fn changed_paths(&self, original: &Value, current: &Value) -> Vec<String> {
        self.inner.differ.changed_paths(original, current)
    }

    pub fn has_changes(&self, original: &Value, current: &Value) -> bool {
        self.inner.differ.has_changes(original, current)
    }

    pub fn is_equal(&self, original: &Value, current: &Value) -> bool {
        self.inner.differ.is_equal(original, current)
    }

    pub fn summarize(&self, original: &Value, current: &Value) -> DiffSummary {
        self.inner.differ.summarize(original, current)
    }

    /// Source-shaped payload holding only what changed; `None` when nothing did
    pub fn build_patch(&self, initial: &Value, current: &Value) -> Result<Option<Value>> {
        let diff = self.inner.differ.options();
        let options = PayloadOptions {
            diff: Some(diff),
            ..self.payload_options()
        };
        payload::build_patch(initial, current, &self.inner.inverse, &options)
    }

    /// Full source-shaped payload with defaults filled in
    pub fn build_post(&self, form: &Value) -> Result<Value> {
        payload::build_post(form, &self.inner.inverse, &self.payload_options())
    }

    pub fn build_put(&self, form: &Value) -> Result<Value> {
        payload::build_put(form, &self.inner.inverse, &self.payload_options())
    }

    /// Source-shaped payload for the named top-level fields of `form`
    pub fn build_partial<I, S>(&self, form: &Value, field_names: I) -> Value
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        payload::build_partial(form, field_names, &self.inner.inverse, &self.payload_options())
    }

    /// Independent copy of the configuration
    pub fn config(&self) -> MapperConfig {
        self.inner.config.clone()
    }

    /// New mapper with `overrides` merged over this configuration; this one is unchanged
    pub fn clone_with(&self, overrides: ConfigOverrides) -> Result<FieldMapper> {
        FieldMapper::new(self.inner.config.merged(overrides))
    }

    fn denormalize_options(&self) -> DenormalizeOptions<'_> {
        let config = &self.inner.config;
        DenormalizeOptions {
            omit_undefined: config.options.omit_undefined,
            omit_null: config.options.omit_null,
            transforms: Some(&config.transforms),
        }
    }

    fn payload_options(&self) -> PayloadOptions<'_> {
        let config = &self.inner.config;
        PayloadOptions {
            denormalize: self.denormalize_options(),
            validator: config.validator.as_deref(),
            defaults: Some(&config.defaults),
            diff: None,
        }
    }
}

impl fmt::Debug for FieldMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMapper")
            .field("config", &self.inner.config)
            .field("inverse", &self.inner.inverse)
            .finish()
    }
}
