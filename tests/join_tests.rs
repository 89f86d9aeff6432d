//! Join: equality cardinality, inequality completeness, output layout.

mod test_data_gen;

use std::collections::HashMap;

use relops_core::prelude::*;
use relops_core::record;
use relops_operators::{join, Join, JoinPredicate, Operator};
use test_data_gen::keyed_store;

fn run(left: &MemStore, right: &MemStore, op: CmpOp) -> MemStore {
    let j = Join::new(JoinPredicate::new("key", op, "key"));
    let plan = j.plan(&[left.schema(), right.schema()]).unwrap();
    let mut out = MemStore::new(plan.output_schema);
    join(left, right, &mut out, &j.predicate).unwrap();
    out
}

fn key_counts(store: &MemStore) -> HashMap<Scalar, usize> {
    let mut counts = HashMap::new();
    for r in store.records() {
        *counts.entry(r.values()[0].clone()).or_insert(0) += 1;
    }
    counts
}

#[test]
fn test_join_example() {
    let schema = Schema::new(vec![
        Field::new("id", DataType::Int64),
        Field::new("v", DataType::Utf8),
    ]);
    let left = MemStore::from_rows(schema.clone(), vec![record![1i64, "a"], record![2i64, "b"]])
        .unwrap();
    let right = MemStore::from_rows(
        schema,
        vec![record![1i64, "x"], record![1i64, "y"], record![3i64, "z"]],
    )
    .unwrap();

    let pred = JoinPredicate::new("id", CmpOp::Eq, "id");
    let plan = Join::new(pred.clone())
        .plan(&[left.schema(), right.schema()])
        .unwrap();
    let mut out = MemStore::new(plan.output_schema);
    join(&left, &right, &mut out, &pred).unwrap();

    assert_eq!(
        out.records(),
        &[record![1i64, "a", "x"], record![1i64, "a", "y"]]
    );
    let names: Vec<_> = out.schema().names().collect();
    assert_eq!(names, vec!["id", "v", "v_right"]);
}

#[test]
fn test_equality_join_cardinality() {
    let left = keyed_store(120, 10, 1);
    let right = keyed_store(80, 14, 2);
    let out = run(&left, &right, CmpOp::Eq);

    let (lc, rc) = (key_counts(&left), key_counts(&right));
    let expected: usize = lc
        .iter()
        .map(|(k, n)| n * rc.get(k).copied().unwrap_or(0))
        .sum();
    assert_eq!(out.len(), expected);

    // Right join field is dropped: 3 left + 2 right fields.
    assert!(out.records().iter().all(|r| r.len() == 5));
}

#[test]
fn test_inequality_join_completeness() {
    let left = keyed_store(40, 6, 3);
    let right = keyed_store(30, 6, 4);
    let eq = run(&left, &right, CmpOp::Eq);
    let ne = run(&left, &right, CmpOp::Ne);

    assert_eq!(ne.len(), left.len() * right.len() - eq.len());
    assert!(ne.records().iter().all(|r| r.len() == 6));
    assert!(ne.records().iter().all(|r| r.values()[0] != r.values()[3]));
}

#[test]
fn test_ordering_join_is_rejected() {
    let left = keyed_store(5, 3, 5);
    let right = keyed_store(5, 3, 6);
    let mut out = MemStore::new(Schema::default());
    let err = join(
        &left,
        &right,
        &mut out,
        &JoinPredicate::new("key", CmpOp::Le, "key"),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperator);
    assert!(out.is_empty());
}

#[test]
fn test_empty_side_joins_to_nothing() {
    let left = keyed_store(0, 3, 7);
    let right = keyed_store(25, 3, 8);
    assert!(run(&left, &right, CmpOp::Eq).is_empty());
    assert!(run(&right, &left, CmpOp::Ne).is_empty());
}
