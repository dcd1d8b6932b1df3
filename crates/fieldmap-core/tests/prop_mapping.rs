//! Property-based tests for the mapper, differ and payload builder
//!
//! These tests verify invariants that should hold for all inputs rather than for the
//! hand-picked records of the integration suite.

use fieldmap_core::{
    build_patch, changed_paths, denormalize, diff, get_path, normalize, DenormalizeOptions, DiffOptions,
    MappingTree, NormalizeOptions, PayloadOptions, Record, Value,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

// Strategy functions for property testing

/// Strategy for scalar leaves, including null
fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        "[a-z0-9 ]{0,8}".prop_map(Value::from),
    ]
}

/// Strategy for arbitrary value trees
fn value_strategy() -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
            prop::collection::btree_map("[a-e]{1,2}", inner, 0..4)
                .prop_map(|entries| Value::Record(entries.into_iter().collect())),
        ]
    })
}

/// Strategy for record-rooted value trees
fn record_strategy() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-e]{1,2}", value_strategy(), 0..4)
        .prop_map(|entries| Value::Record(entries.into_iter().collect()))
}

/// Strategy for a mapping with unique targets: top-level fields plus one nested group
fn mapping_strategy() -> impl Strategy<Value = MappingTree> {
    (
        prop::collection::btree_set("[a-z]{1,6}", 1..6),
        prop::collection::btree_set("[a-z]{1,6}", 0..4),
    )
        .prop_map(|(fields, grouped): (BTreeSet<String>, BTreeSet<String>)| {
            let mut tree = MappingTree::new();
            for field in fields.iter().filter(|f| f.as_str() != "group") {
                tree = tree.field(field.clone(), format!("t_{}", field));
            }
            if !grouped.is_empty() {
                let mut group = MappingTree::new();
                for field in &grouped {
                    group = group.field(field.clone(), format!("g_{}", field));
                }
                tree = tree.nested("group", group);
            }
            tree
        })
}

/// Strategy for a source record filling a random subset of the mapping's fields
fn source_for(mapping: &MappingTree) -> impl Strategy<Value = Value> {
    let paths = mapping.source_paths();
    prop::collection::vec(proptest::option::of(leaf_strategy()), paths.len()).prop_map(move |values| {
        let mut source = Value::empty_record();
        for (path, value) in paths.iter().zip(values) {
            if let Some(value) = value {
                fieldmap_core::set_path(&mut source, path, value);
            }
        }
        source
    })
}

fn contact_mapping() -> MappingTree {
    MappingTree::new()
        .field("user_name", "username")
        .field("status_code", "status")
        .nested(
            "contact",
            MappingTree::new()
                .field("email_address", "email")
                .field("phone_number", "phone"),
        )
}

/// Strategy for target-shaped records over the fields of [`contact_mapping`]
fn contact_form_strategy() -> impl Strategy<Value = Value> {
    prop::collection::vec(proptest::option::of(leaf_strategy()), 4).prop_map(|values| {
        let mut form = Record::new();
        for (key, value) in ["username", "status", "email", "phone"].into_iter().zip(values) {
            if let Some(value) = value {
                form.insert(key.to_string(), value);
            }
        }
        Value::Record(form)
    })
}

proptest! {
    #[test]
    fn prop_round_trip_restores_mapped_paths(
        (mapping, source) in mapping_strategy().prop_flat_map(|mapping| {
            let source = source_for(&mapping);
            (Just(mapping), source)
        })
    ) {
        let options = NormalizeOptions::default().without_coercion();
        let target = normalize(&source, &mapping, &options);
        let restored = denormalize(&target, &mapping, &DenormalizeOptions::default());

        for path in mapping.source_paths() {
            prop_assert_eq!(get_path(&restored, &path), get_path(&source, &path), "path {}", path);
        }
    }

    #[test]
    fn prop_diff_of_identical_trees_is_empty(tree in value_strategy()) {
        let copy = tree.clone();
        prop_assert!(diff(&tree, &copy, &DiffOptions::default()).is_empty_record());
        prop_assert!(diff(&tree, &copy, &DiffOptions::default().deep_arrays()).is_empty_record());
        prop_assert!(changed_paths(&tree, &copy, &DiffOptions::default()).is_empty());
    }

    #[test]
    fn prop_diff_and_changed_paths_agree(a in record_strategy(), b in record_strategy()) {
        let tree = diff(&a, &b, &DiffOptions::default());
        let paths = changed_paths(&a, &b, &DiffOptions::default());

        prop_assert_eq!(a == b, paths.is_empty());
        prop_assert_eq!(a == b, tree.is_empty_record());
    }

    #[test]
    fn prop_patch_is_the_denormalized_diff(
        initial in contact_form_strategy(),
        current in contact_form_strategy(),
    ) {
        let mapping = contact_mapping();
        let patch = build_patch(&initial, &current, &mapping, &PayloadOptions::default()).unwrap();
        let expected = denormalize(
            &diff(&initial, &current, &DiffOptions::default()),
            &mapping,
            &DenormalizeOptions::for_partial_update(),
        );

        match patch {
            Some(patch) => prop_assert_eq!(patch, expected),
            None => prop_assert!(initial == current || expected.is_empty_record()),
        }
    }
}
