//! Convenient re-exports for downstream crates.

pub use crate::config::{ExecConfig, ResultPolicy};
pub use crate::error::{Error, ErrorKind};
pub use crate::record::Record;
pub use crate::schema::{DataType, Field, Schema};
pub use crate::store::{MemStore, Store};
pub use crate::types::{CmpOp, Scalar};
