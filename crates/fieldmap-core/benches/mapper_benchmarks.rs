//! Benchmarks for the mapper, differ and payload builder
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fieldmap_core::{set_path, DiffOptions, Differ, FieldMapper, MappingTree, Value};
use serde_json::json;

fn create_mapping() -> MappingTree {
    MappingTree::from_json(&json!({
        "user_name": "username",
        "status_code": "status",
        "created": "created_at",
        "contact": {
            "email_address": "email",
            "phone_number": "phone",
            "address": {"street_line": "street", "zip": "postal_code"}
        },
        "line_items": [{"sku_code": "sku", "qty": "quantity", "unit_price": "price"}]
    }))
    .expect("benchmark mapping should parse")
}

fn create_source(items: usize) -> Value {
    let lines: Vec<serde_json::Value> = (0..items)
        .map(|i| json!({"sku_code": format!("SKU-{}", i), "qty": "2", "unit_price": "9.99"}))
        .collect();
    Value::from(json!({
        "user_name": "jdoe",
        "status_code": "A",
        "created": "2024-01-15T10:30:00Z",
        "contact": {
            "email_address": "jdoe@example.com",
            "phone_number": "555-0100",
            "address": {"street_line": "1 Main St", "zip": "12345"}
        },
        "line_items": lines
    }))
}

fn bench_normalize(c: &mut Criterion) {
    let mapper = FieldMapper::builder(create_mapping()).build().expect("mapper should build");
    let mut group = c.benchmark_group("normalize");

    for items in [1, 10, 100] {
        let source = create_source(items);
        group.bench_with_input(BenchmarkId::from_parameter(items), &source, |b, source| {
            b.iter(|| mapper.normalize(black_box(source)))
        });
    }
    group.finish();
}

fn bench_diff(c: &mut Criterion) {
    let mapper = FieldMapper::builder(create_mapping()).build().expect("mapper should build");
    let original = mapper.normalize(&create_source(100));
    let mut current = original.clone();
    set_path(&mut current, "email", Value::from("john@example.com"));

    let shallow = Differ::new(DiffOptions::default());
    let deep = Differ::new(DiffOptions::default().deep_arrays());

    c.bench_function("diff_shallow", |b| {
        b.iter(|| shallow.diff(black_box(&original), black_box(&current)))
    });
    c.bench_function("diff_deep_arrays", |b| {
        b.iter(|| deep.diff(black_box(&original), black_box(&current)))
    });
    c.bench_function("changed_paths", |b| {
        b.iter(|| shallow.changed_paths(black_box(&original), black_box(&current)))
    });
}

fn bench_payloads(c: &mut Criterion) {
    let mapper = FieldMapper::builder(create_mapping()).build().expect("mapper should build");
    let loaded = mapper.normalize(&create_source(10));
    let mut edited = loaded.clone();
    set_path(&mut edited, "postal_code", Value::from("54321"));

    c.bench_function("build_patch", |b| {
        b.iter(|| mapper.build_patch(black_box(&loaded), black_box(&edited)))
    });
    c.bench_function("build_post", |b| b.iter(|| mapper.build_post(black_box(&edited))));
}

criterion_group!(benches, bench_normalize, bench_diff, bench_payloads);
criterion_main!(benches);
