//! CSV → `MemStore`.
//!
//! The header row carries the schema: every cell is `name:type`, where `type`
//! is anything `DataType::from_str` accepts (`int`, `float`, `str`, ...).
//!
//! ```text
//! id:int,name:str,score:float
//! 1,ann,3.5
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use relops_core::prelude::{DataType, Field, MemStore, Record, Scalar, Schema, Store};
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct CsvReader {
    delimiter: u8,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<MemStore> {
        let path = path.as_ref();
        let store = self.read_from(File::open(path)?)?;
        debug!(path = %path.display(), rows = store.len(), "loaded csv");
        Ok(store)
    }

    pub fn read_from<R: Read>(&self, reader: R) -> Result<MemStore> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let schema = parse_header(rdr.headers()?)?;
        let mut store = MemStore::new(schema.clone());
        for (row, result) in rdr.records().enumerate() {
            let rec = result?;
            if rec.len() != schema.len() {
                return Err(relops_core::Error::SchemaMismatch(format!(
                    "row {} has {} fields, header declares {}",
                    row + 1,
                    rec.len(),
                    schema.len()
                ))
                .into());
            }
            let values = rec
                .iter()
                .zip(&schema.fields)
                .map(|(text, field)| parse_cell(row + 1, text, field))
                .collect::<Result<Vec<_>>>()?;
            store.insert(Record::new(values))?;
        }
        Ok(store)
    }
}

fn parse_header(header: &csv::StringRecord) -> Result<Schema> {
    let fields = header
        .iter()
        .map(|cell| {
            let (name, ty) = cell.split_once(':').ok_or_else(|| Error::Header {
                cell: cell.to_string(),
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::Header {
                    cell: cell.to_string(),
                });
            }
            Ok(Field::new(name, ty.parse::<DataType>()?))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Schema::new(fields))
}

fn parse_cell(row: usize, text: &str, field: &Field) -> Result<Scalar> {
    let parse_err = || Error::Parse {
        row,
        field: field.name.clone(),
        text: text.to_string(),
        expected: field.data_type,
    };
    match field.data_type {
        DataType::Int64 => text.parse().map(Scalar::I64).map_err(|_| parse_err()),
        DataType::Float64 => text.parse().map(Scalar::F64).map_err(|_| parse_err()),
        DataType::Utf8 => Ok(Scalar::Str(text.to_string())),
    }
}
