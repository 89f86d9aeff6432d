//! Logical schema types. Pure data; records are validated against these by the
//! store, and operators resolve field names to positions through them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Int64,
    Float64,
    Utf8,
}

impl DataType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int64 | DataType::Float64)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataType::Int64 => "int64",
            DataType::Float64 => "float64",
            DataType::Utf8 => "utf8",
        };
        f.write_str(s)
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "i64" | "int64" => Ok(DataType::Int64),
            "float" | "f64" | "float64" | "double" => Ok(DataType::Float64),
            "str" | "string" | "utf8" => Ok(DataType::Utf8),
            other => Err(Error::SchemaMismatch(format!("unknown data type '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    /// Resolve a field name to its zero-based position.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Schema of the requested fields, in request order.
    pub fn project<S: AsRef<str>>(&self, names: &[S]) -> Result<Schema> {
        let fields = names
            .iter()
            .map(|name| {
                let idx = self.index_of(name.as_ref())?;
                Ok(self.fields[idx].clone())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Schema { fields })
    }

    /// Left fields followed by right fields, optionally skipping one right
    /// position. Right names that collide with a left name get a `_right`
    /// suffix so output names stay unique.
    pub fn join(left: &Schema, right: &Schema, skip_right: Option<usize>) -> Schema {
        let mut fields = left.fields.clone();
        for (idx, field) in right.fields.iter().enumerate() {
            if Some(idx) == skip_right {
                continue;
            }
            let mut field = field.clone();
            if left.fields.iter().any(|f| f.name == field.name) {
                field.name = format!("{}_right", field.name);
            }
            fields.push(field);
        }
        Schema { fields }
    }
}
