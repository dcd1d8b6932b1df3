//! Target-to-source conversion driven by the inverse mapping
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use crate::mapping::{InverseMapping, InverseTarget, MappingRef};
use crate::transform::{apply_optional, TransformContext, TransformDirection, TransformRegistry};
use crate::value::{get_path, set_path, Record, Value};

/// Omission rules and transforms for [`denormalize`]
#[derive(Debug, Clone, Copy)]
pub struct DenormalizeOptions<'a> {
    /// Skip fields whose value is absent
    pub omit_undefined: bool,
    /// Skip fields whose value is null
    pub omit_null: bool,
    pub transforms: Option<&'a TransformRegistry>,
}

impl Default for DenormalizeOptions<'_> {
    fn default() -> Self {
        Self {
            omit_undefined: true,
            omit_null: false,
            transforms: None,
        }
    }
}

impl<'a> DenormalizeOptions<'a> {
    /// Never omit anything; used for full-replacement submissions
    pub fn for_full_replacement() -> Self {
        Self::default().full_replacement()
    }

    /// Omit absent fields; used for partial updates
    pub fn for_partial_update() -> Self {
        Self::default().partial_update()
    }

    /// These options with both omission flags cleared
    pub fn full_replacement(self) -> Self {
        Self {
            omit_undefined: false,
            omit_null: false,
            ..self
        }
    }

    /// These options with absent fields omitted; `omit_null` is kept as configured
    pub fn partial_update(self) -> Self {
        Self {
            omit_undefined: true,
            ..self
        }
    }

    pub fn with_transforms(mut self, transforms: Option<&'a TransformRegistry>) -> Self {
        self.transforms = transforms;
        self
    }

    fn omits(&self, value: &Value) -> bool {
        (self.omit_undefined && value.is_absent()) || (self.omit_null && value.is_null())
    }
}

/// Convert target-schema data back to source shape
///
/// `mapping` may be the forward tree (inverted on the fly) or a precomputed inverse.
pub fn denormalize<'m>(
    target: &Value,
    mapping: impl Into<MappingRef<'m>>,
    options: &DenormalizeOptions<'_>,
) -> Value {
    let inverse = mapping.into().to_inverse();
    tracing::trace!(
        fields = inverse.len(),
        omit_undefined = options.omit_undefined,
        omit_null = options.omit_null,
        "denormalizing"
    );
    denormalize_with_inverse(target, &inverse, options)
}

fn denormalize_with_inverse(
    target: &Value,
    inverse: &InverseMapping,
    options: &DenormalizeOptions<'_>,
) -> Value {
    let mut output = Value::empty_record();
    for (target_path, entry) in inverse {
        let value = get_path(target, target_path);
        if options.omits(value) {
            continue;
        }

        let value = match entry {
            InverseTarget::Path(_) => value.clone(),
            InverseTarget::Repeated { elements, .. } => denormalize_elements(value, elements, options),
        };
        let context = TransformContext {
            direction: TransformDirection::Denormalize,
            field: target_path,
            source_path: entry.source_path(),
            scope: target,
        };
        let value = apply_optional(options.transforms, value, &context);
        set_path(&mut output, entry.source_path(), value);
    }
    output
}

/// Map the elements of a repeated field
///
/// Besides full sequences this accepts the sparse index records a deep array diff produces
/// (`{"1": {...}}`), keeping their index keys.
fn denormalize_elements(value: &Value, elements: &InverseMapping, options: &DenormalizeOptions<'_>) -> Value {
    let element = |item: &Value| match item {
        Value::Record(_) => denormalize_with_inverse(item, elements, options),
        other => other.clone(),
    };
    match value {
        Value::Sequence(items) => Value::Sequence(items.iter().map(element).collect()),
        Value::Record(sparse) => Value::Record(
            sparse
                .iter()
                .map(|(index, item)| (index.clone(), element(item)))
                .collect::<Record>(),
        ),
        other => other.clone(),
    }
}
