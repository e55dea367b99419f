//! Benchmark for fold/unfold of large forms

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use query_rule_builder::codec::{fold_query, unfold_query};
use query_rule_builder::form::{FieldValue, FlatCondition, FlatGroup};
use query_rule_builder::query::{Action, Combinator, DEFAULT_QUERY_ID};
use query_rule_builder::{default_catalogue, QueryBuilder};

fn leaf(i: usize) -> FlatCondition {
    match i % 3 {
        0 => FlatCondition {
            query_attribute: Some("Status".to_string()),
            query_contain: Some(Action::Contains),
            query_value: Some(FieldValue::text(format!("status-{}", i))),
            ..Default::default()
        },
        1 => FlatCondition {
            query_attribute: Some("Communication".to_string()),
            query_contain: Some(Action::NotContains),
            query_value: Some("Email".into()),
            query_sub_value: Some("Content".into()),
            query_final_value: Some(FieldValue::text(format!("message-{}", i))),
            ..Default::default()
        },
        _ => FlatCondition {
            query_attribute: Some("Profile holder age".to_string()),
            query_contain: Some(Action::Between),
            min_age: Some(18),
            max_age: Some(65),
            ..Default::default()
        },
    }
}

/// 200 leaves at the root
fn wide_form() -> FlatGroup {
    FlatGroup {
        query_type: Some(Combinator::And),
        condition: (0..200).map(leaf).collect(),
        nested_condition: Vec::new(),
    }
}

/// Binary tree of groups, five leaves per group
fn deep_form(depth: usize) -> FlatGroup {
    FlatGroup {
        query_type: Some(if depth % 2 == 0 { Combinator::And } else { Combinator::Or }),
        condition: (0..5).map(leaf).collect(),
        nested_condition: if depth == 0 {
            Vec::new()
        } else {
            vec![deep_form(depth - 1), deep_form(depth - 1)]
        },
    }
}

fn benchmark_fold(c: &mut Criterion) {
    let wide = wide_form();
    let deep = deep_form(6);

    c.bench_function("fold_wide", |b| {
        b.iter(|| fold_query(black_box(&wide), DEFAULT_QUERY_ID))
    });

    c.bench_function("fold_deep", |b| {
        b.iter(|| fold_query(black_box(&deep), DEFAULT_QUERY_ID))
    });
}

fn benchmark_unfold(c: &mut Criterion) {
    let catalogue = default_catalogue();
    let wide = fold_query(&wide_form(), DEFAULT_QUERY_ID).expect("benchmark form is complete");
    let deep = fold_query(&deep_form(6), DEFAULT_QUERY_ID).expect("benchmark form is complete");

    c.bench_function("unfold_wide", |b| {
        b.iter(|| unfold_query(black_box(&wide), &catalogue))
    });

    c.bench_function("unfold_deep", |b| {
        b.iter(|| unfold_query(black_box(&deep), &catalogue))
    });
}

fn benchmark_submit(c: &mut Criterion) {
    let tree = fold_query(&deep_form(6), DEFAULT_QUERY_ID).expect("benchmark form is complete");
    let json = tree.to_json().expect("benchmark tree serializes");

    c.bench_function("load_validate_submit", |b| {
        b.iter(|| {
            let tree = query_rule_builder::QueryTree::from_json_str(black_box(&json))
                .expect("benchmark json parses");
            let mut builder = QueryBuilder::load(default_catalogue(), &tree);
            builder.submit().map(|tree| tree.node_count()).expect("benchmark form is valid")
        })
    });
}

criterion_group!(benches, benchmark_fold, benchmark_unfold, benchmark_submit);
criterion_main!(benches);
