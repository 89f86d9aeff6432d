//! Aggregate operator: SUM/AVG/MIN/MAX/COUNT over one numeric field, either
//! globally or per distinct value of a group-by field.
//!
//! Every row's aggregate field must be numeric, COUNT included; a string in
//! that position fails the whole call. Result typing follows
//! [`ResultPolicy`]:
//!
//! | policy   | grouped        | ungrouped                              |
//! |----------|----------------|----------------------------------------|
//! | `Float`  | F64, COUNT I64 | F64, COUNT I64                         |
//! | `Legacy` | F64 for all    | SUM/MIN/MAX I64 (truncated), AVG F64, COUNT I64 |
//!
//! Ungrouped AVG/MIN/MAX over zero rows emit 0 rather than failing; that is a
//! fallback, not a statistic. Grouped aggregation over zero rows emits nothing.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use relops_core::prelude::{
    DataType, Error, ExecConfig, Field, Record, ResultPolicy, Scalar, Schema, Store,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::plan::OpPlan;
use crate::traits::{expect_inputs, ExecStats, OpError, Operator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateOp {
    Sum,
    Avg,
    Min,
    Max,
    Count,
}

impl AggregateOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AggregateOp::Sum => "sum",
            AggregateOp::Avg => "avg",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
            AggregateOp::Count => "count",
        }
    }

    fn result_type(self, grouped: bool, policy: ResultPolicy) -> DataType {
        match (policy, self) {
            (ResultPolicy::Float, AggregateOp::Count) => DataType::Int64,
            (ResultPolicy::Float, _) => DataType::Float64,
            (ResultPolicy::Legacy, _) if grouped => DataType::Float64,
            (ResultPolicy::Legacy, AggregateOp::Avg) => DataType::Float64,
            (ResultPolicy::Legacy, _) => DataType::Int64,
        }
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregateOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(AggregateOp::Sum),
            "avg" | "mean" => Ok(AggregateOp::Avg),
            "min" => Ok(AggregateOp::Min),
            "max" => Ok(AggregateOp::Max),
            "count" => Ok(AggregateOp::Count),
            other => Err(Error::unsupported("aggregate", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSpec {
    pub field: String,
    pub op: AggregateOp,
    #[serde(default)]
    pub group_by: Option<String>,
}

impl AggregateSpec {
    pub fn new(field: impl Into<String>, op: AggregateOp) -> Self {
        Self {
            field: field.into(),
            op,
            group_by: None,
        }
    }

    pub fn group_by(mut self, field: impl Into<String>) -> Self {
        self.group_by = Some(field.into());
        self
    }

    /// Name of the result column, e.g. `avg_score`.
    pub fn result_name(&self) -> String {
        format!("{}_{}", self.op, self.field)
    }
}

/// Running state for one group. SUM and AVG share `sum`/`count`.
#[derive(Debug, Clone, Default)]
struct Accumulator {
    sum: f64,
    count: u64,
    min: Option<f64>,
    max: Option<f64>,
}

impl Accumulator {
    fn update(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        // First value seen initializes; later ones replace only when strictly
        // smaller/larger.
        if self.min.map_or(true, |m| value < m) {
            self.min = Some(value);
        }
        if self.max.map_or(true, |m| value > m) {
            self.max = Some(value);
        }
    }

    fn finish(&self, op: AggregateOp, out_type: DataType) -> Scalar {
        let value = match op {
            AggregateOp::Sum => self.sum,
            AggregateOp::Avg if self.count == 0 => 0.0,
            AggregateOp::Avg => self.sum / self.count as f64,
            AggregateOp::Min => self.min.unwrap_or(0.0),
            AggregateOp::Max => self.max.unwrap_or(0.0),
            AggregateOp::Count => return typed_count(self.count, out_type),
        };
        match out_type {
            // `as` truncates toward zero and saturates at the i64 bounds.
            DataType::Int64 => Scalar::I64(value as i64),
            _ => Scalar::F64(value),
        }
    }
}

fn typed_count(count: u64, out_type: DataType) -> Scalar {
    match out_type {
        DataType::Float64 => Scalar::F64(count as f64),
        _ => Scalar::I64(i64::try_from(count).unwrap_or(i64::MAX)),
    }
}

/// Per-call group table. Keys hash by field-value equality; emission follows
/// first-appearance order.
struct Groups {
    slots: HashMap<Scalar, usize>,
    entries: Vec<(Scalar, Accumulator)>,
}

impl Groups {
    fn with_capacity(cap: usize) -> Self {
        Self {
            slots: HashMap::with_capacity(cap),
            entries: Vec::with_capacity(cap),
        }
    }

    fn entry(&mut self, key: &Scalar) -> &mut Accumulator {
        let idx = match self.slots.get(key) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.slots.insert(key.clone(), idx);
                self.entries.push((key.clone(), Accumulator::default()));
                idx
            }
        };
        &mut self.entries[idx].1
    }
}

#[derive(Debug, Clone)]
pub struct Aggregate {
    pub spec: AggregateSpec,
    pub config: ExecConfig,
}

struct Bound {
    value_idx: usize,
    group_idx: Option<usize>,
    output_schema: Schema,
}

impl Aggregate {
    pub fn new(spec: AggregateSpec) -> Self {
        Self {
            spec,
            config: ExecConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExecConfig) -> Self {
        self.config = config;
        self
    }

    fn bind(&self, schema: &Schema) -> Result<Bound, Error> {
        let value_idx = schema.index_of(&self.spec.field)?;
        let value_type = schema.fields[value_idx].data_type;
        if !value_type.is_numeric() {
            return Err(Error::NonNumeric {
                field: self.spec.field.clone(),
                found: value_type,
            });
        }

        let group_idx = self
            .spec
            .group_by
            .as_deref()
            .map(|g| schema.index_of(g))
            .transpose()?;

        let out_type = self
            .spec
            .op
            .result_type(group_idx.is_some(), self.config.result_policy);
        let mut fields = Vec::with_capacity(2);
        if let Some(g) = group_idx {
            fields.push(schema.fields[g].clone());
        }
        fields.push(Field::new(self.spec.result_name(), out_type));

        Ok(Bound {
            value_idx,
            group_idx,
            output_schema: Schema::new(fields),
        })
    }

    fn numeric(&self, record: &Record, idx: usize) -> Result<f64, Error> {
        let value = record
            .get(idx)
            .ok_or_else(|| Error::SchemaMismatch(format!("record has no position {idx}")))?;
        value.as_f64().ok_or_else(|| Error::NonNumeric {
            field: self.spec.field.clone(),
            found: value.data_type(),
        })
    }
}

impl Operator for Aggregate {
    fn name(&self) -> &'static str {
        "aggregate"
    }

    fn plan(&self, input_schemas: &[&Schema]) -> Result<OpPlan, OpError> {
        expect_inputs(self.name(), input_schemas.len(), 1)?;
        let bound = self.bind(input_schemas[0])?;
        Ok(OpPlan::new(bound.output_schema)
            .with_hash_keys(self.spec.group_by.iter().cloned().collect()))
    }

    fn execute(
        &self,
        inputs: &[&dyn Store],
        out: &mut dyn Store,
    ) -> Result<ExecStats, OpError> {
        expect_inputs(self.name(), inputs.len(), 1)?;
        let input = inputs[0];
        let bound = self.bind(input.schema())?;
        let op = self.spec.op;
        let out_type = bound.output_schema.fields[bound.output_schema.len() - 1].data_type;

        debug!(
            field = %self.spec.field,
            op = %op,
            group_by = ?self.spec.group_by,
            "aggregate start"
        );
        let mut stats = ExecStats::default();

        match bound.group_idx {
            Some(group_idx) => {
                let mut groups = Groups::with_capacity(self.config.capacity_hint());
                for record in input.scan() {
                    stats.rows_in += 1;
                    let value = self.numeric(record, bound.value_idx)?;
                    let key = record.get(group_idx).ok_or_else(|| {
                        Error::SchemaMismatch(format!("record has no position {group_idx}"))
                    })?;
                    groups.entry(key).update(value);
                }
                for (key, acc) in groups.entries {
                    let result = acc.finish(op, out_type);
                    trace!(key = %key, result = %result, "group");
                    out.insert(Record::new(vec![key, result]))?;
                    stats.rows_out += 1;
                }
            }
            None => {
                let mut acc = Accumulator::default();
                for record in input.scan() {
                    stats.rows_in += 1;
                    acc.update(self.numeric(record, bound.value_idx)?);
                }
                let fallback = matches!(op, AggregateOp::Avg | AggregateOp::Min | AggregateOp::Max);
                if acc.count == 0 && fallback {
                    warn!(op = %op, field = %self.spec.field, "no rows; emitting 0");
                }
                out.insert(Record::new(vec![acc.finish(op, out_type)]))?;
                stats.rows_out = 1;
            }
        }

        debug!(rows_in = stats.rows_in, rows_out = stats.rows_out, "aggregate done");
        Ok(stats)
    }
}
