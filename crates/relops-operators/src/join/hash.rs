//! Single-pass hash equi-join. The left side must fit in memory.

use std::collections::HashMap;

use relops_core::prelude::{Error, Record, Scalar, Store};

use super::JoinKeys;
use crate::traits::{ExecStats, OpError};

pub(super) fn run(
    left: &dyn Store,
    right: &dyn Store,
    out: &mut dyn Store,
    keys: JoinKeys,
    capacity: usize,
) -> Result<ExecStats, OpError> {
    let mut stats = ExecStats::default();

    // Build: key -> left records in scan order. Duplicate keys accumulate.
    let mut table: HashMap<&Scalar, Vec<&Record>> = HashMap::with_capacity(capacity);
    for record in left.scan() {
        stats.rows_in += 1;
        table
            .entry(key_at(record, keys.left)?)
            .or_default()
            .push(record);
    }

    // Probe with each right record once; matches come out in left scan order.
    for record in right.scan() {
        stats.rows_in += 1;
        let key = key_at(record, keys.right)?;
        let Some(matches) = table.get(key) else {
            continue;
        };
        for left_record in matches {
            out.insert(Record::concat(left_record, record, Some(keys.right)))?;
            stats.rows_out += 1;
        }
    }

    Ok(stats)
}

fn key_at(record: &Record, idx: usize) -> Result<&Scalar, Error> {
    record
        .get(idx)
        .ok_or_else(|| Error::SchemaMismatch(format!("record has no join position {idx}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use relops_core::prelude::*;
    use relops_core::record;

    #[test]
    fn duplicate_keys_multiply() {
        let schema = Schema::new(vec![Field::new("k", DataType::Utf8)]);
        let left = MemStore::from_rows(
            schema.clone(),
            vec![record!["a"], record!["a"], record!["b"]],
        )
        .unwrap();
        let right = MemStore::from_rows(
            schema,
            vec![record!["a"], record!["a"], record!["a"], record!["c"]],
        )
        .unwrap();
        let mut out = MemStore::new(Schema::new(vec![Field::new("k", DataType::Utf8)]));
        let stats = run(&left, &right, &mut out, JoinKeys { left: 0, right: 0 }, 4).unwrap();
        assert_eq!(stats.rows_out, 6);
        assert_eq!(stats.rows_in, 7);
    }
}
