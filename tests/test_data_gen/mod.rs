//! Deterministic fixture generators shared by the integration tests.

#![allow(dead_code)]

use relops_core::prelude::{DataType, Field, MemStore, Record, Scalar, Schema};

/// Small linear congruential generator; reproducible without extra crates.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    pub fn below(&mut self, n: u64) -> i64 {
        (self.next_u64() % n) as i64
    }
}

/// `(key:int, tag:str, amount:float)` rows with keys in `0..key_space`.
pub fn keyed_store(rows: usize, key_space: u64, seed: u64) -> MemStore {
    let schema = Schema::new(vec![
        Field::new("key", DataType::Int64),
        Field::new("tag", DataType::Utf8),
        Field::new("amount", DataType::Float64),
    ]);
    let mut rng = Lcg::new(seed);
    let rows = (0..rows).map(|i| {
        Record::new(vec![
            Scalar::I64(rng.below(key_space)),
            Scalar::Str(format!("t{}", i % 7)),
            Scalar::F64(rng.below(1000) as f64 / 4.0),
        ])
    });
    MemStore::from_rows(schema, rows).expect("generated rows match schema")
}

pub fn people() -> MemStore {
    let schema = Schema::new(vec![
        Field::new("name", DataType::Utf8),
        Field::new("age", DataType::Int64),
    ]);
    MemStore::from_rows(
        schema,
        vec![
            relops_core::record!["a", 15i64],
            relops_core::record!["b", 20i64],
        ],
    )
    .expect("people fixture")
}
