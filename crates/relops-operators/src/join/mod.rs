//! Join operator.
//!
//! - `Eq` runs a single-pass hash join: the whole left side is loaded into a
//!   key → records multimap, then the right side is probed once.
//! - `Ne` runs a nested loop over every left × right pair.
//! - Ordering comparisons are rejected before either side is scanned.
//!
//! Output is left fields then right fields; equality joins drop the right join
//! field since it repeats the left one.

mod hash;
mod nested_loop;

use relops_core::prelude::{CmpOp, Error, ExecConfig, Schema, Store};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::plan::OpPlan;
use crate::traits::{expect_inputs, ExecStats, OpError, Operator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinPredicate {
    pub left: String,
    pub op: CmpOp,
    pub right: String,
}

impl JoinPredicate {
    pub fn new(left: impl Into<String>, op: CmpOp, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            op,
            right: right.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Join {
    pub predicate: JoinPredicate,
    pub config: ExecConfig,
}

/// Join fields resolved against both input schemas.
#[derive(Debug, Clone, Copy)]
pub(crate) struct JoinKeys {
    pub left: usize,
    pub right: usize,
}

impl Join {
    pub fn new(predicate: JoinPredicate) -> Self {
        Self {
            predicate,
            config: ExecConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExecConfig) -> Self {
        self.config = config;
        self
    }

    fn bind(&self, left: &Schema, right: &Schema) -> Result<JoinKeys, Error> {
        if !matches!(self.predicate.op, CmpOp::Eq | CmpOp::Ne) {
            return Err(Error::unsupported("join", self.predicate.op.symbol()));
        }
        let keys = JoinKeys {
            left: left.index_of(&self.predicate.left)?,
            right: right.index_of(&self.predicate.right)?,
        };
        let lt = left.fields[keys.left].data_type;
        let rt = right.fields[keys.right].data_type;
        if lt != rt {
            return Err(Error::TypeMismatch {
                context: "join",
                left: lt,
                right: rt,
            });
        }
        Ok(keys)
    }

    fn skip_right(&self, keys: JoinKeys) -> Option<usize> {
        (self.predicate.op == CmpOp::Eq).then_some(keys.right)
    }
}

impl Operator for Join {
    fn name(&self) -> &'static str {
        match self.predicate.op {
            CmpOp::Eq => "join_hash",
            _ => "join_nested_loop",
        }
    }

    fn plan(&self, input_schemas: &[&Schema]) -> Result<OpPlan, OpError> {
        expect_inputs("join", input_schemas.len(), 2)?;
        let (left, right) = (input_schemas[0], input_schemas[1]);
        let keys = self.bind(left, right)?;
        let plan = OpPlan::new(Schema::join(left, right, self.skip_right(keys)));
        Ok(match self.predicate.op {
            CmpOp::Eq => plan.with_hash_keys(vec![self.predicate.left.clone()]),
            _ => plan,
        })
    }

    fn execute(
        &self,
        inputs: &[&dyn Store],
        out: &mut dyn Store,
    ) -> Result<ExecStats, OpError> {
        expect_inputs("join", inputs.len(), 2)?;
        let (left, right) = (inputs[0], inputs[1]);
        let keys = self.bind(left.schema(), right.schema())?;

        debug!(
            left = %self.predicate.left,
            op = %self.predicate.op,
            right = %self.predicate.right,
            strategy = self.name(),
            "join start"
        );
        let stats = match self.predicate.op {
            CmpOp::Eq => hash::run(left, right, out, keys, self.config.capacity_hint())?,
            _ => nested_loop::run(left, right, out, keys)?,
        };
        debug!(rows_in = stats.rows_in, rows_out = stats.rows_out, "join done");
        Ok(stats)
    }
}
