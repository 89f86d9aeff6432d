//! Immutable fixed-arity records. Operators build new records from old ones;
//! nothing mutates a record after construction.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Scalar;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    values: Vec<Scalar>,
}

impl Record {
    pub fn new(values: Vec<Scalar>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Scalar> {
        self.values.get(idx)
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Scalar> {
        self.values
    }

    /// New record holding the values at `indices`, in that order.
    ///
    /// An index past the end means the record is shorter than its schema.
    pub fn project(&self, indices: &[usize]) -> Result<Record> {
        indices
            .iter()
            .map(|&i| {
                self.values.get(i).cloned().ok_or_else(|| {
                    Error::SchemaMismatch(format!("record has no position {i}"))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Record::new)
    }

    /// All of `left` followed by all of `right` except position `skip_right`.
    pub fn concat(left: &Record, right: &Record, skip_right: Option<usize>) -> Record {
        let mut values = Vec::with_capacity(left.len() + right.len());
        values.extend(left.values.iter().cloned());
        values.extend(
            right
                .values
                .iter()
                .enumerate()
                .filter(|(idx, _)| Some(*idx) != skip_right)
                .map(|(_, v)| v.clone()),
        );
        Record::new(values)
    }
}

impl From<Vec<Scalar>> for Record {
    fn from(values: Vec<Scalar>) -> Self {
        Record::new(values)
    }
}

/// Build a [`Record`] from a list of values convertible into [`Scalar`].
///
/// ```
/// use relops_core::record;
/// let r = record![1i64, "a", 2.5];
/// assert_eq!(r.len(), 3);
/// ```
#[macro_export]
macro_rules! record {
    ($($v:expr),* $(,)?) => {
        $crate::record::Record::new(vec![$($crate::types::Scalar::from($v)),*])
    };
}
