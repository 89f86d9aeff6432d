//! Filter operator: conjunction of `field OP constant` predicates.
//!
//! Predicates are evaluated in order and short-circuit on the first one that
//! fails. A predicate whose constant does not match its field's kind is
//! rejected before the scan starts.

use std::cmp::Reverse;

use relops_core::prelude::{CmpOp, DataType, Error, Record, Scalar, Schema, Store};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::plan::OpPlan;
use crate::traits::{expect_inputs, ExecStats, OpError, Operator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPredicate {
    pub field: String,
    pub op: CmpOp,
    pub value: Scalar,
}

impl FilterPredicate {
    pub fn new(field: impl Into<String>, op: CmpOp, value: impl Into<Scalar>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Parse a simple predicate like `age > 18` or `name == 'Alice'`.
    ///
    /// The literal is typed from the field's kind in `schema`; string
    /// literals may be wrapped in single or double quotes.
    pub fn parse(expr: &str, schema: &Schema) -> Result<Self, Error> {
        let ops = ["==", "!=", "<>", "<=", ">=", "<", ">", "="];

        // Earliest operator in the text wins, so a literal may contain
        // operator characters. At equal positions the longer token wins
        // (`<=` over `<`).
        let (pos, token) = ops
            .iter()
            .filter_map(|op| expr.find(op).map(|pos| (pos, *op)))
            .min_by_key(|&(pos, op)| (pos, Reverse(op.len())))
            .ok_or_else(|| Error::unsupported("comparison", expr.trim()))?;

        let field = expr[..pos].trim().to_string();
        let literal = expr[pos + token.len()..].trim();
        let op: CmpOp = token.parse()?;

        let idx = schema.index_of(&field)?;
        let value = parse_literal(literal, schema.fields[idx].data_type)?;
        Ok(Self { field, op, value })
    }
}

fn parse_literal(literal: &str, data_type: DataType) -> Result<Scalar, Error> {
    let mismatch = || Error::TypeMismatch {
        context: "filter literal",
        left: data_type,
        right: DataType::Utf8,
    };
    match data_type {
        DataType::Int64 => literal.parse::<i64>().map(Scalar::I64).map_err(|_| mismatch()),
        DataType::Float64 => literal.parse::<f64>().map(Scalar::F64).map_err(|_| mismatch()),
        DataType::Utf8 => {
            let unquoted = literal
                .strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
                .or_else(|| literal.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
                .unwrap_or(literal);
            Ok(Scalar::Str(unquoted.to_string()))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Filter {
    /// Implicit AND. Empty means pass-through.
    pub predicates: Vec<FilterPredicate>,
}

impl Filter {
    pub fn new(predicates: Vec<FilterPredicate>) -> Self {
        Self { predicates }
    }

    /// Resolve predicate fields to positions and check constant kinds.
    fn bind(&self, schema: &Schema) -> Result<Vec<(usize, CmpOp, &Scalar)>, Error> {
        self.predicates
            .iter()
            .map(|p| {
                let idx = schema.index_of(&p.field)?;
                let field_type = schema.fields[idx].data_type;
                if field_type != p.value.data_type() {
                    return Err(Error::TypeMismatch {
                        context: "filter",
                        left: field_type,
                        right: p.value.data_type(),
                    });
                }
                Ok((idx, p.op, &p.value))
            })
            .collect()
    }
}

fn matches(record: &Record, bound: &[(usize, CmpOp, &Scalar)]) -> Result<bool, Error> {
    for &(idx, op, constant) in bound {
        let value = record
            .get(idx)
            .ok_or_else(|| Error::SchemaMismatch(format!("record has no position {idx}")))?;
        if !value.compare(op, constant)? {
            return Ok(false);
        }
    }
    Ok(true)
}

impl Operator for Filter {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn plan(&self, input_schemas: &[&Schema]) -> Result<OpPlan, OpError> {
        expect_inputs(self.name(), input_schemas.len(), 1)?;
        let schema = input_schemas[0];
        self.bind(schema)?;
        Ok(OpPlan::new(schema.clone()))
    }

    fn execute(
        &self,
        inputs: &[&dyn Store],
        out: &mut dyn Store,
    ) -> Result<ExecStats, OpError> {
        expect_inputs(self.name(), inputs.len(), 1)?;
        let input = inputs[0];
        let bound = self.bind(input.schema())?;

        debug!(predicates = bound.len(), "filter start");
        let mut stats = ExecStats::default();
        for record in input.scan() {
            stats.rows_in += 1;
            if matches(record, &bound)? {
                out.insert(record.clone())?;
                stats.rows_out += 1;
            }
        }
        debug!(rows_in = stats.rows_in, rows_out = stats.rows_out, "filter done");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relops_core::prelude::*;
    use relops_core::record;

    fn people() -> MemStore {
        let schema = Schema::new(vec![
            Field::new("name", DataType::Utf8),
            Field::new("age", DataType::Int64),
            Field::new("score", DataType::Float64),
        ]);
        MemStore::from_rows(
            schema,
            vec![
                record!["a", 15i64, 1.5],
                record!["b", 20i64, 2.5],
                record!["c", 42i64, 0.5],
            ],
        )
        .unwrap()
    }

    fn run(predicates: Vec<FilterPredicate>) -> Result<MemStore, OpError> {
        let input = people();
        let mut out = MemStore::new(input.schema().clone());
        Filter::new(predicates).execute(&[&input], &mut out)?;
        Ok(out)
    }

    #[test]
    fn keeps_matching_rows_in_order() {
        let out = run(vec![FilterPredicate::new("age", CmpOp::Gt, 18i64)]).unwrap();
        assert_eq!(
            out.records(),
            &[record!["b", 20i64, 2.5], record!["c", 42i64, 0.5]]
        );
    }

    #[test]
    fn predicates_are_conjunctive() {
        let out = run(vec![
            FilterPredicate::new("age", CmpOp::Ge, 15i64),
            FilterPredicate::new("score", CmpOp::Lt, 2.0),
            FilterPredicate::new("name", CmpOp::Ne, "c"),
        ])
        .unwrap();
        assert_eq!(out.records(), &[record!["a", 15i64, 1.5]]);
    }

    #[test]
    fn empty_predicates_pass_everything() {
        let out = run(vec![]).unwrap();
        assert_eq!(out.records(), people().records());
    }

    #[test]
    fn kind_mismatch_aborts_before_scan() {
        let err = run(vec![
            FilterPredicate::new("age", CmpOp::Gt, 0i64),
            FilterPredicate::new("age", CmpOp::Eq, "20"),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn unknown_field_is_field_resolution() {
        let err = run(vec![FilterPredicate::new("height", CmpOp::Eq, 1i64)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldResolution);
    }

    #[test]
    fn parse_types_literal_from_schema() {
        let schema = people().schema().clone();
        let p = FilterPredicate::parse("age >= 18", &schema).unwrap();
        assert_eq!(p, FilterPredicate::new("age", CmpOp::Ge, 18i64));

        let p = FilterPredicate::parse("name == 'b'", &schema).unwrap();
        assert_eq!(p, FilterPredicate::new("name", CmpOp::Eq, "b"));

        let p = FilterPredicate::parse("score<>2.5", &schema).unwrap();
        assert_eq!(p, FilterPredicate::new("score", CmpOp::Ne, 2.5));
    }

    #[test]
    fn parse_splits_at_first_operator() {
        let schema = people().schema().clone();
        let p = FilterPredicate::parse("name != 'a==b'", &schema).unwrap();
        assert_eq!(p, FilterPredicate::new("name", CmpOp::Ne, "a==b"));

        let p = FilterPredicate::parse("name > '<'", &schema).unwrap();
        assert_eq!(p, FilterPredicate::new("name", CmpOp::Gt, "<"));

        let p = FilterPredicate::parse("name = \"x<=y\"", &schema).unwrap();
        assert_eq!(p, FilterPredicate::new("name", CmpOp::Eq, "x<=y"));

        let p = FilterPredicate::parse("age<=18", &schema).unwrap();
        assert_eq!(p, FilterPredicate::new("age", CmpOp::Le, 18i64));
    }

    #[test]
    fn parse_rejects_bad_input() {
        let schema = people().schema().clone();
        let err = FilterPredicate::parse("age ~ 3", &schema).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperator);
        let err = FilterPredicate::parse("age > old", &schema).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        let err = FilterPredicate::parse("height > 3", &schema).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldResolution);
    }
}
