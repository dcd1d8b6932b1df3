//! Submission payloads composed from the differ and the denormalizer
//!
//! - [`build_patch`] - only what changed, under partial-update omission rules
//! - [`build_post`] / [`build_put`] - the full record with defaults filled in
//! - [`build_partial`] - a named subset of top-level fields
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use crate::denormalizer::{denormalize, DenormalizeOptions};
use crate::differ::{DiffOptions, Differ};
use crate::mapping::MappingRef;
use crate::validator::{ensure_valid, Validator};
use crate::value::{deep_merge, Record, Value};
use crate::Result;
use std::collections::HashSet;

/// Collaborators shared by the payload builders
#[derive(Clone, Copy, Default)]
pub struct PayloadOptions<'a> {
    /// Base omission rules and transforms; each builder forces only the flags its rules name
    pub denormalize: DenormalizeOptions<'a>,
    pub validator: Option<&'a dyn Validator>,
    /// Merged under the form data by `build_post`/`build_put`
    pub defaults: Option<&'a Value>,
    /// Differ settings for `build_patch`; shallow comparison with nothing ignored when unset
    pub diff: Option<&'a DiffOptions>,
}

/// Source-shaped payload containing only the changes from `initial` to `current`
///
/// Returns `Ok(None)` when the two trees are equal or when nothing survives
/// denormalization. The validator, if any, sees the target-shaped change tree.
///
/// # Example
///
/// ```
/// use fieldmap_core::payload::{build_patch, PayloadOptions};
/// use fieldmap_core::{MappingTree, Value};
/// use serde_json::json;
///
/// let mapping = MappingTree::from_json(&json!({
///     "user_name": "username",
///     "contact": { "email_address": "email" }
/// })).unwrap();
/// let initial = Value::from(json!({"username": "j", "email": "e"}));
/// let current = Value::from(json!({"username": "j", "email": "e2"}));
///
/// let patch = build_patch(&initial, &current, &mapping, &PayloadOptions::default()).unwrap();
/// assert_eq!(patch.unwrap().to_json(), json!({"contact": {"email_address": "e2"}}));
/// ```
pub fn build_patch<'m>(
    initial: &Value,
    current: &Value,
    mapping: impl Into<MappingRef<'m>>,
    options: &PayloadOptions<'_>,
) -> Result<Option<Value>> {
    if initial == current {
        return Ok(None);
    }

    let changes = match options.diff {
        Some(diff) => Differ::new(diff.clone()).diff(initial, current),
        None => Differ::default().diff(initial, current),
    };
    ensure_valid(options.validator, &changes)?;

    let denormalize_options = options.denormalize.partial_update();
    let payload = denormalize(&changes, mapping, &denormalize_options);
    if payload.is_empty_record() {
        tracing::debug!("change tree denormalized to nothing, no patch");
        return Ok(None);
    }

    tracing::debug!(
        fields = payload.as_record().map_or(0, |record| record.len()),
        "built patch payload"
    );
    Ok(Some(payload))
}

/// Full source-shaped payload for creating a record
///
/// Defaults are merged under `form` (form values win), the merged value is validated, then
/// denormalized without omitting anything.
pub fn build_post<'m>(
    form: &Value,
    mapping: impl Into<MappingRef<'m>>,
    options: &PayloadOptions<'_>,
) -> Result<Value> {
    let merged = match options.defaults {
        Some(defaults) => deep_merge(defaults, form),
        None => form.clone(),
    };
    ensure_valid(options.validator, &merged)?;

    let denormalize_options = options.denormalize.full_replacement();
    Ok(denormalize(&merged, mapping, &denormalize_options))
}

/// Full source-shaped payload for replacing a record; identical to [`build_post`]
pub fn build_put<'m>(
    form: &Value,
    mapping: impl Into<MappingRef<'m>>,
    options: &PayloadOptions<'_>,
) -> Result<Value> {
    build_post(form, mapping, options)
}

/// Source-shaped payload restricted to the named top-level fields of `form`
///
/// Names missing from `form` are skipped. No validation is performed.
pub fn build_partial<'m, I, S>(
    form: &Value,
    field_names: I,
    mapping: impl Into<MappingRef<'m>>,
    options: &PayloadOptions<'_>,
) -> Value
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let wanted: HashSet<String> = field_names
        .into_iter()
        .map(|name| name.as_ref().to_string())
        .collect();
    let subset: Record = form
        .as_record()
        .map(|record| {
            record
                .iter()
                .filter(|(key, _)| wanted.contains(key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default();

    denormalize(&Value::Record(subset), mapping, &options.denormalize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{invert_mapping, MappingTree};
    use crate::transform::{built_in, TransformRegistry};
    use crate::Error;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn user_mapping() -> MappingTree {
        MappingTree::from_json(&json!({
            "user_name": "username",
            "status_code": "status",
            "contact": {"email_address": "email", "phone_number": "phone"}
        }))
        .unwrap()
    }

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_patch_contains_only_changes() {
        let initial = v(json!({"username": "j", "email": "e"}));
        let current = v(json!({"username": "j", "email": "e2"}));

        let patch = build_patch(&initial, &current, &user_mapping(), &PayloadOptions::default()).unwrap();
        assert_eq!(patch, Some(v(json!({"contact": {"email_address": "e2"}}))));
    }

    #[test]
    fn test_patch_none_when_equal() {
        let form = v(json!({"username": "j", "email": "e"}));
        let patch = build_patch(&form, &form.clone(), &user_mapping(), &PayloadOptions::default()).unwrap();
        assert_eq!(patch, None);
    }

    #[test]
    fn test_patch_none_when_only_unmapped_fields_change() {
        let initial = v(json!({"username": "j", "internal": 1}));
        let current = v(json!({"username": "j", "internal": 2}));

        let patch = build_patch(&initial, &current, &user_mapping(), &PayloadOptions::default()).unwrap();
        assert_eq!(patch, None);
    }

    #[test]
    fn test_patch_drops_removed_fields() {
        let initial = v(json!({"username": "j", "email": "e", "phone": "555"}));
        let current = v(json!({"username": "j", "phone": "556"}));

        let patch = build_patch(&initial, &current, &user_mapping(), &PayloadOptions::default()).unwrap();
        assert_eq!(patch, Some(v(json!({"contact": {"phone_number": "556"}}))));
    }

    #[test]
    fn test_patch_keeps_explicit_null() {
        let initial = v(json!({"username": "j", "email": "e"}));
        let current = v(json!({"username": "j", "email": null}));

        let patch = build_patch(&initial, &current, &user_mapping(), &PayloadOptions::default()).unwrap();
        assert_eq!(patch, Some(v(json!({"contact": {"email_address": null}}))));
    }

    #[test]
    fn test_patch_with_precomputed_inverse_and_transforms() {
        let inverse = invert_mapping(&user_mapping());
        let mut transforms = TransformRegistry::new();
        transforms.insert("status", built_in::enum_mapping([("A", "active"), ("I", "inactive")], None));

        let initial = v(json!({"status": "active"}));
        let current = v(json!({"status": "inactive"}));
        let options = PayloadOptions {
            denormalize: DenormalizeOptions::default().with_transforms(Some(&transforms)),
            ..PayloadOptions::default()
        };

        let patch = build_patch(&initial, &current, &inverse, &options).unwrap();
        assert_eq!(patch, Some(v(json!({"status_code": "I"}))));
    }

    #[test]
    fn test_patch_validator_sees_change_tree() {
        let validator = |changes: &Value| -> std::result::Result<(), Vec<String>> {
            match changes.get("username") {
                Value::String(name) if name.is_empty() => Err(vec!["username must not be empty".to_string()]),
                _ => Ok(()),
            }
        };
        let options = PayloadOptions {
            validator: Some(&validator),
            ..PayloadOptions::default()
        };
        let initial = v(json!({"username": "j"}));

        let err = build_patch(&initial, &v(json!({"username": ""})), &user_mapping(), &options).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(err.validation_messages(), ["username must not be empty".to_string()]);

        assert!(build_patch(&initial, &v(json!({"username": "k"})), &user_mapping(), &options).is_ok());
    }

    #[test]
    fn test_patch_honours_ignore_paths() {
        let diff = DiffOptions::default().ignore("email");
        let options = PayloadOptions {
            diff: Some(&diff),
            ..PayloadOptions::default()
        };

        let initial = v(json!({"username": "j", "email": "e"}));
        let current = v(json!({"username": "j", "email": "e2"}));
        assert_eq!(build_patch(&initial, &current, &user_mapping(), &options).unwrap(), None);
    }

    #[test]
    fn test_post_merges_defaults_under_form() {
        let defaults = v(json!({"status": "draft", "username": "anonymous"}));
        let options = PayloadOptions {
            defaults: Some(&defaults),
            ..PayloadOptions::default()
        };

        let payload = build_post(&v(json!({"username": "j", "email": "e"})), &user_mapping(), &options).unwrap();
        assert_eq!(
            payload.to_json(),
            json!({"user_name": "j", "status_code": "draft", "contact": {"email_address": "e"}})
        );
        // unset fields are kept as absent markers under full-replacement rules
        assert!(payload.get("contact").get("phone_number").is_absent());
    }

    #[test]
    fn test_put_matches_post() {
        let form = v(json!({"username": "j", "phone": "555"}));
        let options = PayloadOptions::default();

        assert_eq!(
            build_put(&form, &user_mapping(), &options).unwrap(),
            build_post(&form, &user_mapping(), &options).unwrap()
        );
    }

    #[test]
    fn test_post_validator_sees_merged_form() {
        let defaults = v(json!({"email": "default@example.com"}));
        let validator = |form: &Value| -> std::result::Result<(), Vec<String>> {
            if form.get("email").is_present() {
                Ok(())
            } else {
                Err(vec!["email is required".to_string()])
            }
        };

        let without_defaults = PayloadOptions {
            validator: Some(&validator),
            ..PayloadOptions::default()
        };
        let err = build_post(&v(json!({"username": "j"})), &user_mapping(), &without_defaults).unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: email is required");

        let with_defaults = PayloadOptions {
            defaults: Some(&defaults),
            ..without_defaults
        };
        assert!(build_put(&v(json!({"username": "j"})), &user_mapping(), &with_defaults).is_ok());
    }

    #[test]
    fn test_partial_keeps_named_fields() {
        let form = v(json!({"username": "j", "email": "e", "phone": "555"}));

        let payload = build_partial(&form, ["email", "missing"], &user_mapping(), &PayloadOptions::default());
        assert_eq!(payload, v(json!({"contact": {"email_address": "e"}})));
    }

    #[test]
    fn test_omit_null_reaches_patch_and_partial() {
        let options = PayloadOptions {
            denormalize: DenormalizeOptions {
                omit_null: true,
                ..DenormalizeOptions::default()
            },
            ..PayloadOptions::default()
        };
        let initial = v(json!({"username": "j", "email": "e"}));
        let current = v(json!({"username": "k", "email": null}));

        let patch = build_patch(&initial, &current, &user_mapping(), &options).unwrap();
        assert_eq!(patch, Some(v(json!({"user_name": "k"}))));

        let partial = build_partial(&current, ["username", "email"], &user_mapping(), &options);
        assert_eq!(partial, v(json!({"user_name": "k"})));

        // full replacement still keeps nulls
        let post = build_post(&current, &user_mapping(), &options).unwrap();
        assert!(post.get("contact").get("email_address").is_null());
    }

    #[test]
    fn test_partial_skips_validation() {
        let reject_all = |_: &Value| -> std::result::Result<(), Vec<String>> { Err(vec!["no".to_string()]) };
        let options = PayloadOptions {
            validator: Some(&reject_all),
            ..PayloadOptions::default()
        };

        let payload = build_partial(&v(json!({"username": "j"})), vec!["username".to_string()], &user_mapping(), &options);
        assert_eq!(payload, v(json!({"user_name": "j"})));
    }
}
