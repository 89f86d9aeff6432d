//! Operator trait + common interfaces.
//!
//! Callers may `plan(...)` first to learn the output schema (and to surface
//! field-resolution, type and operator errors without touching data), then
//! `execute(...)` into an output store built for that schema.

use relops_core::prelude::{Error, ErrorKind, Schema, Store};

use crate::plan::OpPlan;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("planning error: {0}")]
    Plan(String),

    #[error(transparent)]
    Core(#[from] Error),
}

impl OpError {
    /// Which contract was violated. Wrong input arity counts as a schema error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OpError::Plan(_) => ErrorKind::Schema,
            OpError::Core(e) => e.kind(),
        }
    }
}

/// Row counts observed by one `execute` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecStats {
    pub rows_in: u64,
    pub rows_out: u64,
}

/// Trait that all operators implement.
///
/// Invariants:
/// - `execute` only reads its inputs through `Store::scan` and only writes
///   through `Store::insert`; it never modifies existing output rows.
/// - No state survives between calls.
pub trait Operator: Send + Sync {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    /// Given input schemas, return the output schema and hash key fields.
    fn plan(&self, input_schemas: &[&Schema]) -> Result<OpPlan, OpError>;

    /// Run to completion, appending results to `out`.
    ///
    /// Unary ops read `inputs[0]`; joins read `inputs[0]` (left) and
    /// `inputs[1]` (right).
    fn execute(
        &self,
        inputs: &[&dyn Store],
        out: &mut dyn Store,
    ) -> Result<ExecStats, OpError>;
}

pub(crate) fn expect_inputs(op: &str, got: usize, n: usize) -> Result<(), OpError> {
    if got != n {
        return Err(OpError::Plan(format!("{op} expects {n} input(s), got {got}")));
    }
    Ok(())
}
