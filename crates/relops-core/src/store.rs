//! The record-store contract the operators consume and produce through, plus
//! an in-memory implementation.
//!
//! Operators only ever call `schema`, `scan` and `insert`; page layout and
//! persistence are the store's own business.

use crate::error::{Error, Result};
use crate::record::Record;
use crate::schema::Schema;

/// Ordered, iterable, insertable collection of records sharing one schema.
pub trait Store {
    /// Field layout; stable for the duration of any operator call.
    fn schema(&self) -> &Schema;

    /// Fresh forward-only iterator over the records in native order.
    /// Scanning never mutates the store.
    fn scan(&self) -> Box<dyn Iterator<Item = &Record> + '_>;

    /// Append one record. Purely additive; existing records are untouched.
    fn insert(&mut self, record: Record) -> Result<()>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `Vec`-backed store that checks arity and per-position kinds on insert.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    schema: Schema,
    records: Vec<Record>,
}

impl MemStore {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    pub fn from_rows<I>(schema: Schema, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut store = Self::new(schema);
        for row in rows {
            store.insert(row)?;
        }
        Ok(store)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    fn check(&self, record: &Record) -> Result<()> {
        if record.len() != self.schema.len() {
            return Err(Error::SchemaMismatch(format!(
                "record has {} fields, schema expects {}",
                record.len(),
                self.schema.len()
            )));
        }
        for (value, field) in record.values().iter().zip(&self.schema.fields) {
            if value.data_type() != field.data_type {
                return Err(Error::SchemaMismatch(format!(
                    "field '{}' expects {}, got {}",
                    field.name,
                    field.data_type,
                    value.data_type()
                )));
            }
        }
        Ok(())
    }
}

impl Store for MemStore {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn scan(&self) -> Box<dyn Iterator<Item = &Record> + '_> {
        Box::new(self.records.iter())
    }

    fn insert(&mut self, record: Record) -> Result<()> {
        self.check(&record)?;
        self.records.push(record);
        Ok(())
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
