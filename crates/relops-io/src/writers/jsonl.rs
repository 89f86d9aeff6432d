//! Streaming NDJSON writer.
//!
//! One JSON object per record, keys in schema order. Duplicate field names
//! (a projection may repeat a field) are written as repeated keys rather than
//! collapsed.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use relops_core::prelude::{Record, Scalar, Schema, Store};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Result;

pub struct JsonlWriter<W: Write> {
    writer: BufWriter<W>,
    rows: u64,
}

impl JsonlWriter<File> {
    pub fn to_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::create(path)?;
        Ok(Self::to_writer(f))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn to_writer(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            rows: 0,
        }
    }

    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    pub fn write_record(&mut self, schema: &Schema, record: &Record) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &RowRef { schema, record })?;
        self.writer.write_all(b"\n")?;
        self.rows += 1;
        Ok(())
    }

    /// Write every record of `store`, then flush.
    pub fn write_store(&mut self, store: &dyn Store) -> Result<()> {
        let schema = store.schema();
        for record in store.scan() {
            self.write_record(schema, record)?;
        }
        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::Error::Io(e.into_error()))
    }
}

struct RowRef<'a> {
    schema: &'a Schema,
    record: &'a Record,
}

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.record.len()))?;
        for (field, value) in self.schema.fields.iter().zip(self.record.values()) {
            map.serialize_entry(&field.name, &scalar_to_json(value))?;
        }
        map.end()
    }
}

fn scalar_to_json(v: &Scalar) -> serde_json::Value {
    match v {
        Scalar::I64(i) => serde_json::Value::from(*i),
        // Non-finite floats have no JSON form and become null.
        Scalar::F64(f) => serde_json::Value::from(*f),
        Scalar::Str(s) => serde_json::Value::String(s.clone()),
    }
}
