//! Mapper configuration, its JSON document form, and overrides
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use crate::differ::DiffOptions;
use crate::mapping::{InverseMapping, MappingTree};
use crate::transform::{BuiltInTransform, TransformRegistry};
use crate::validator::Validator;
use crate::value::{deep_merge, Value};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Behaviour switches shared by every operation of a mapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperOptions {
    /// Coerce numeric, boolean and date-time strings while normalizing
    pub type_coercion: bool,
    /// Skip absent fields while denormalizing
    pub omit_undefined: bool,
    /// Skip null fields while denormalizing
    pub omit_null: bool,
    /// Diff equal-length sequences index by index
    pub compare_arrays_deeply: bool,
    /// Paths the differ never reports
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub ignore_paths: BTreeSet<String>,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            type_coercion: true,
            omit_undefined: true,
            omit_null: false,
            compare_arrays_deeply: false,
            ignore_paths: BTreeSet::new(),
        }
    }
}

impl MapperOptions {
    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            compare_arrays_deeply: self.compare_arrays_deeply,
            ignore_paths: self.ignore_paths.iter().cloned().collect(),
        }
    }
}

/// Everything a [`FieldMapper`](super::FieldMapper) is built from
#[derive(Clone, Default)]
pub struct MapperConfig {
    pub mapping: MappingTree,
    /// Explicit inverse; derived from `mapping` when `None`
    pub inverse: Option<InverseMapping>,
    pub transforms: TransformRegistry,
    /// Record normalization starts from and `build_post` merges under form data
    pub defaults: Value,
    pub validator: Option<Arc<dyn Validator>>,
    pub options: MapperOptions,
}

impl fmt::Debug for MapperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperConfig")
            .field("mapping", &self.mapping)
            .field("inverse", &self.inverse)
            .field("transforms", &self.transforms)
            .field("defaults", &self.defaults)
            .field("validator", &self.validator.as_ref().map(|_| "<validator>"))
            .field("options", &self.options)
            .finish()
    }
}

impl MapperConfig {
    pub fn new(mapping: MappingTree) -> Self {
        Self {
            mapping,
            defaults: Value::empty_record(),
            ..Self::default()
        }
    }

    /// Load a configuration document from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let document: MapperConfigDocument = serde_json::from_str(text)?;
        Self::from_document(document)
    }

    /// Load a configuration document from a parsed JSON value
    pub fn from_json_value(json: serde_json::Value) -> Result<Self> {
        let document: MapperConfigDocument = serde_json::from_value(json)?;
        Self::from_document(document)
    }

    /// Build a configuration from its document form
    ///
    /// Declared transforms with an unknown `type` are skipped with a warning so code can
    /// register them afterwards; a known type with bad parameters is an error.
    pub fn from_document(document: MapperConfigDocument) -> Result<Self> {
        let mut transforms = TransformRegistry::new();
        for (field, declaration) in &document.transforms {
            if let Some(transform) = parse_transform(field, declaration)? {
                transforms.insert(field.clone(), transform);
            }
        }

        let defaults = match document.defaults {
            Value::Absent | Value::Null => Value::empty_record(),
            defaults @ Value::Record(_) => defaults,
            other => {
                return Err(Error::configuration(format!(
                    "defaults must be a record, found {:?}",
                    other.kind()
                )))
            }
        };

        Ok(Self {
            mapping: document.mapping,
            inverse: document.inverse,
            transforms,
            defaults,
            validator: None,
            options: document.options,
        })
    }

    /// Data part of this configuration, suitable for persisting
    ///
    /// Only transforms with a declarative form are included; the validator never is.
    pub fn to_document(&self) -> MapperConfigDocument {
        MapperConfigDocument {
            mapping: self.mapping.clone(),
            inverse: self.inverse.clone(),
            transforms: self.transforms.describe(),
            defaults: self.defaults.clone(),
            options: self.options.clone(),
        }
    }

    /// New configuration with `overrides` merged over this one
    ///
    /// Mapping trees, transforms and defaults merge deeply; the validator and individual
    /// options are replaced when given. A mapping override without an inverse override
    /// drops any explicit inverse so it is derived again from the merged tree.
    pub fn merged(&self, overrides: ConfigOverrides) -> MapperConfig {
        let mapping_changed = overrides.mapping.is_some();
        let mapping = match &overrides.mapping {
            Some(mapping) => self.mapping.merge(mapping),
            None => self.mapping.clone(),
        };
        let inverse = match (overrides.inverse, &self.inverse) {
            (Some(overlay), Some(base)) if !mapping_changed => Some(base.merge(&overlay)),
            (Some(overlay), _) => Some(overlay),
            (None, _) if mapping_changed => None,
            (None, inverse) => inverse.clone(),
        };
        let transforms = match &overrides.transforms {
            Some(transforms) => self.transforms.merged(transforms),
            None => self.transforms.clone(),
        };
        let defaults = match &overrides.defaults {
            Some(defaults) => deep_merge(&self.defaults, defaults),
            None => self.defaults.clone(),
        };

        MapperConfig {
            mapping,
            inverse,
            transforms,
            defaults,
            validator: overrides.validator.or_else(|| self.validator.clone()),
            options: overrides.options.apply(&self.options),
        }
    }
}

fn parse_transform(field: &str, declaration: &serde_json::Value) -> Result<Option<BuiltInTransform>> {
    let name = declaration
        .get("type")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    if !BuiltInTransform::NAMES.iter().any(|known| *known == name) {
        log::warn!("Skipping transform for field '{}': unknown type '{}'", field, name);
        return Ok(None);
    }
    serde_json::from_value(declaration.clone())
        .map(Some)
        .map_err(|err| Error::Configuration {
            message: format!("invalid '{}' transform for field '{}'", name, field),
            source: Some(anyhow::Error::new(err)),
        })
}

/// Serializable part of a [`MapperConfig`]
///
/// ```json
/// {
///   "mapping": {"user_name": "username", "contact": {"email_address": "email"}},
///   "transforms": {"status": {"type": "enum_mapping", "mappings": {"A": "active"}}},
///   "defaults": {"status": "draft"},
///   "options": {"omit_null": true}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfigDocument {
    pub mapping: MappingTree,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inverse: Option<InverseMapping>,
    /// Declared built-in transforms keyed by target field name
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub transforms: IndexMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub defaults: Value,
    pub options: MapperOptions,
}

/// Option values to replace; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsOverride {
    pub type_coercion: Option<bool>,
    pub omit_undefined: Option<bool>,
    pub omit_null: Option<bool>,
    pub compare_arrays_deeply: Option<bool>,
    pub ignore_paths: Option<BTreeSet<String>>,
}

impl OptionsOverride {
    fn apply(self, base: &MapperOptions) -> MapperOptions {
        MapperOptions {
            type_coercion: self.type_coercion.unwrap_or(base.type_coercion),
            omit_undefined: self.omit_undefined.unwrap_or(base.omit_undefined),
            omit_null: self.omit_null.unwrap_or(base.omit_null),
            compare_arrays_deeply: self.compare_arrays_deeply.unwrap_or(base.compare_arrays_deeply),
            ignore_paths: self.ignore_paths.unwrap_or_else(|| base.ignore_paths.clone()),
        }
    }
}

/// Partial configuration merged by [`FieldMapper::clone_with`](super::FieldMapper::clone_with)
#[derive(Clone, Default)]
pub struct ConfigOverrides {
    pub mapping: Option<MappingTree>,
    pub inverse: Option<InverseMapping>,
    pub transforms: Option<TransformRegistry>,
    pub defaults: Option<Value>,
    pub validator: Option<Arc<dyn Validator>>,
    pub options: OptionsOverride,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mapping(mut self, mapping: MappingTree) -> Self {
        self.mapping = Some(mapping);
        self
    }

    pub fn inverse(mut self, inverse: InverseMapping) -> Self {
        self.inverse = Some(inverse);
        self
    }

    pub fn transforms(mut self, transforms: TransformRegistry) -> Self {
        self.transforms = Some(transforms);
        self
    }

    pub fn defaults(mut self, defaults: impl Into<Value>) -> Self {
        self.defaults = Some(defaults.into());
        self
    }

    pub fn validator<V>(mut self, validator: V) -> Self
    where
        V: Validator + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn type_coercion(mut self, enabled: bool) -> Self {
        self.options.type_coercion = Some(enabled);
        self
    }

    pub fn omit_undefined(mut self, enabled: bool) -> Self {
        self.options.omit_undefined = Some(enabled);
        self
    }

    pub fn omit_null(mut self, enabled: bool) -> Self {
        self.options.omit_null = Some(enabled);
        self
    }

    pub fn compare_arrays_deeply(mut self, enabled: bool) -> Self {
        self.options.compare_arrays_deeply = Some(enabled);
        self
    }

    /// Replace the ignored diff paths
    pub fn ignore_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.ignore_paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }
}

impl fmt::Debug for ConfigOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOverrides")
            .field("mapping", &self.mapping)
            .field("inverse", &self.inverse)
            .field("transforms", &self.transforms)
            .field("defaults", &self.defaults)
            .field("validator", &self.validator.as_ref().map(|_| "<validator>"))
            .field("options", &self.options)
            .finish()
    }
}
