//! Project operator: keep a chosen subset of fields, in a chosen order.

use relops_core::prelude::{Schema, Store};
use tracing::debug;

use crate::plan::OpPlan;
use crate::traits::{expect_inputs, ExecStats, OpError, Operator};

#[derive(Debug, Clone, Default)]
pub struct Project {
    /// Output field names, in output order. Duplicates are allowed.
    pub fields: Vec<String>,
}

impl Project {
    pub fn new<S: AsRef<str>>(fields: &[S]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
        }
    }
}

impl Operator for Project {
    fn name(&self) -> &'static str {
        "project"
    }

    fn plan(&self, input_schemas: &[&Schema]) -> Result<OpPlan, OpError> {
        expect_inputs(self.name(), input_schemas.len(), 1)?;
        Ok(OpPlan::new(input_schemas[0].project(&self.fields)?))
    }

    fn execute(
        &self,
        inputs: &[&dyn Store],
        out: &mut dyn Store,
    ) -> Result<ExecStats, OpError> {
        expect_inputs(self.name(), inputs.len(), 1)?;
        let input = inputs[0];
        let schema = input.schema();

        // Resolve every name before the scan so a bad name emits nothing.
        let indices = self
            .fields
            .iter()
            .map(|name| schema.index_of(name))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(fields = ?self.fields, "project start");
        let mut stats = ExecStats::default();
        for record in input.scan() {
            stats.rows_in += 1;
            out.insert(record.project(&indices)?)?;
            stats.rows_out += 1;
        }
        debug!(rows_in = stats.rows_in, rows_out = stats.rows_out, "project done");
        Ok(stats)
    }
}
