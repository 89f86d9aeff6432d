//! Field values and the comparison operators defined over them.
//!
//! `Scalar` is a closed sum type: every comparison and every numeric
//! conversion is an exhaustive match, and cross-kind comparisons surface as
//! `Error::TypeMismatch` instead of an arbitrary ordering.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::DataType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Scalar {
    I64(i64),
    F64(f64),
    Str(String),
}

impl Scalar {
    pub fn data_type(&self) -> DataType {
        match self {
            Scalar::I64(_) => DataType::Int64,
            Scalar::F64(_) => DataType::Float64,
            Scalar::Str(_) => DataType::Utf8,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.data_type().is_numeric()
    }

    /// Numeric view of the value; `None` for strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::I64(i) => Some(*i as f64),
            Scalar::F64(f) => Some(*f),
            Scalar::Str(_) => None,
        }
    }

    /// Same-kind ordering. Floats use a total order with `-0.0 == 0.0` and all
    /// NaNs equal to each other and greater than every number.
    pub fn try_cmp(&self, other: &Scalar) -> Result<Ordering> {
        match (self, other) {
            (Scalar::I64(a), Scalar::I64(b)) => Ok(a.cmp(b)),
            (Scalar::F64(a), Scalar::F64(b)) => {
                Ok(canonical_f64(*a).total_cmp(&canonical_f64(*b)))
            }
            (Scalar::Str(a), Scalar::Str(b)) => Ok(a.cmp(b)),
            _ => Err(Error::TypeMismatch {
                context: "comparison",
                left: self.data_type(),
                right: other.data_type(),
            }),
        }
    }

    /// Evaluate `self OP other`.
    pub fn compare(&self, op: CmpOp, other: &Scalar) -> Result<bool> {
        Ok(op.holds(self.try_cmp(other)?))
    }
}

fn canonical_f64(f: f64) -> f64 {
    if f == 0.0 {
        0.0
    } else if f.is_nan() {
        f64::NAN
    } else {
        f
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.try_cmp(other), Ok(Ordering::Equal))
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Scalar::I64(i) => i.hash(state),
            Scalar::F64(f) => canonical_f64(*f).to_bits().hash(state),
            Scalar::Str(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::I64(i) => write!(f, "{i}"),
            Scalar::F64(x) => write!(f, "{x}"),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::I64(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::F64(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

/// Binary comparison operator shared by filter and join predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn holds(self, ord: Ordering) -> bool {
        match self {
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Le => ord != Ordering::Greater,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Ge => ord != Ordering::Less,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CmpOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "=" | "==" | "eq" => Ok(CmpOp::Eq),
            "!=" | "<>" | "ne" => Ok(CmpOp::Ne),
            "<" | "lt" => Ok(CmpOp::Lt),
            "<=" | "le" => Ok(CmpOp::Le),
            ">" | "gt" => Ok(CmpOp::Gt),
            ">=" | "ge" => Ok(CmpOp::Ge),
            other => Err(Error::unsupported("comparison", other)),
        }
    }
}
