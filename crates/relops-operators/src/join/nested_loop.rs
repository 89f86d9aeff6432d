//! Nested-loop inequality join: O(|left| * |right|), no index structure.

use relops_core::prelude::{CmpOp, Error, Record, Scalar, Store};

use super::JoinKeys;
use crate::traits::{ExecStats, OpError};

pub(super) fn run(
    left: &dyn Store,
    right: &dyn Store,
    out: &mut dyn Store,
    keys: JoinKeys,
) -> Result<ExecStats, OpError> {
    let mut stats = ExecStats::default();
    for left_record in left.scan() {
        stats.rows_in += 1;
        let left_key = field(left_record, keys.left)?;
        // A fresh right scan per left record; stores are not rewindable.
        for right_record in right.scan() {
            let right_key = field(right_record, keys.right)?;
            if left_key.compare(CmpOp::Ne, right_key)? {
                out.insert(Record::concat(left_record, right_record, None))?;
                stats.rows_out += 1;
            }
        }
    }
    stats.rows_in += right.len() as u64;
    Ok(stats)
}

fn field(record: &Record, idx: usize) -> Result<&Scalar, Error> {
    record
        .get(idx)
        .ok_or_else(|| Error::SchemaMismatch(format!("record has no join position {idx}")))
}
