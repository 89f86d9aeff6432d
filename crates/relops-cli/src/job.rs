//! YAML job files: one operator over one or two CSV inputs.
//!
//! Example:
//! ```yaml
//! inputs: ["people.csv"]
//! op: aggregate
//! field: salary
//! func: avg
//! group_by: dept
//! config:
//!   result_policy: legacy
//! ```
//!
//! Operator and function names stay strings here so unknown names surface as
//! the operators' own "unsupported operator" errors.

use std::path::{Path, PathBuf};

use relops_core::prelude::{CmpOp, ExecConfig, MemStore, Schema, Store};
use relops_io::CsvReader;
use relops_operators::{
    Aggregate, AggregateSpec, ExecStats, Filter, FilterPredicate, Join, JoinPredicate, OpError,
    OpPlan, Operator, Project,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("job file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("reading job file: {0}")]
    Read(#[from] std::io::Error),

    #[error(transparent)]
    Io(#[from] relops_io::Error),

    #[error(transparent)]
    Core(#[from] relops_core::Error),

    #[error(transparent)]
    Op(#[from] OpError),

    #[error("{op} expects {expected} input(s), job lists {got}")]
    Inputs {
        op: &'static str,
        expected: usize,
        got: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub inputs: Vec<PathBuf>,
    #[serde(flatten)]
    pub step: Step,
    #[serde(default)]
    pub config: JobConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Step {
    Project {
        fields: Vec<String>,
    },
    Filter {
        #[serde(default)]
        predicates: Vec<String>,
    },
    Aggregate {
        field: String,
        func: String,
        #[serde(default)]
        group_by: Option<String>,
    },
    Join {
        left: String,
        #[serde(default = "default_join_op")]
        op: String,
        right: String,
    },
}

fn default_join_op() -> String {
    "==".to_string()
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::Project { .. } => "project",
            Step::Filter { .. } => "filter",
            Step::Aggregate { .. } => "aggregate",
            Step::Join { .. } => "join",
        }
    }

    fn arity(&self) -> usize {
        match self {
            Step::Join { .. } => 2,
            _ => 1,
        }
    }
}

/// Per-job overrides layered over `ExecConfig::from_env()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobConfig {
    #[serde(default)]
    pub result_policy: Option<String>,
    #[serde(default)]
    pub hash_capacity_hint: Option<usize>,
}

impl JobConfig {
    pub fn apply(&self, cfg: &mut ExecConfig) -> Result<(), JobError> {
        if let Some(policy) = &self.result_policy {
            cfg.result_policy = policy.parse()?;
        }
        if let Some(cap) = self.hash_capacity_hint {
            cfg.set_hash_capacity_hint(cap)?;
        }
        Ok(())
    }
}

pub fn parse_job(yaml: &str) -> Result<Job, JobError> {
    Ok(serde_yaml::from_str(yaml)?)
}

pub fn load_job(path: &Path) -> Result<Job, JobError> {
    parse_job(&std::fs::read_to_string(path)?)
}

/// A job with its inputs loaded and its operator built and planned.
pub struct Prepared {
    pub inputs: Vec<MemStore>,
    pub operator: Box<dyn Operator>,
    pub plan: OpPlan,
}

impl Prepared {
    pub fn execute(&self) -> Result<(MemStore, ExecStats), JobError> {
        let inputs: Vec<&dyn Store> = self.inputs.iter().map(|s| s as &dyn Store).collect();
        let mut out = MemStore::new(self.plan.output_schema.clone());
        let stats = self.operator.execute(&inputs, &mut out)?;
        info!(
            op = self.operator.name(),
            rows_in = stats.rows_in,
            rows_out = stats.rows_out,
            "job finished"
        );
        Ok((out, stats))
    }
}

/// Resolve input paths against `base` (the job file's directory), load them,
/// build the operator and plan it.
pub fn prepare(job: &Job, base: &Path, mut config: ExecConfig) -> Result<Prepared, JobError> {
    if job.inputs.len() != job.step.arity() {
        return Err(JobError::Inputs {
            op: job.step.name(),
            expected: job.step.arity(),
            got: job.inputs.len(),
        });
    }
    job.config.apply(&mut config)?;

    let reader = CsvReader::new();
    let inputs = job
        .inputs
        .iter()
        .map(|p| reader.read_path(base.join(p)))
        .collect::<Result<Vec<_>, _>>()?;
    let schemas: Vec<&Schema> = inputs.iter().map(|s| s.schema()).collect();

    let operator = build_operator(&job.step, &schemas, config)?;
    let plan = operator.plan(&schemas)?;
    Ok(Prepared {
        inputs,
        operator,
        plan,
    })
}

fn build_operator(
    step: &Step,
    schemas: &[&Schema],
    config: ExecConfig,
) -> Result<Box<dyn Operator>, JobError> {
    Ok(match step {
        Step::Project { fields } => Box::new(Project::new(fields.as_slice())),
        Step::Filter { predicates } => {
            let predicates = predicates
                .iter()
                .map(|expr| FilterPredicate::parse(expr, schemas[0]))
                .collect::<Result<Vec<_>, _>>()?;
            Box::new(Filter::new(predicates))
        }
        Step::Aggregate {
            field,
            func,
            group_by,
        } => {
            let spec = AggregateSpec {
                field: field.clone(),
                op: func.parse()?,
                group_by: group_by.clone(),
            };
            Box::new(Aggregate::new(spec).with_config(config))
        }
        Step::Join { left, op, right } => {
            let op: CmpOp = op.parse()?;
            Box::new(Join::new(JoinPredicate::new(left, op, right)).with_config(config))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use relops_core::prelude::*;
    use relops_core::record;
    use std::fs;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    fn fixtures() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "people.csv",
            "id:int,name:str,dept:str,salary:int\n1,ann,eng,100\n2,bob,ops,40\n3,cy,eng,50\n",
        );
        write(dir.path(), "teams.csv", "dept:str,floor:int\neng,3\nops,1\neng,4\n");
        dir
    }

    fn run(dir: &Path, yaml: &str) -> Result<MemStore, JobError> {
        let job = parse_job(yaml)?;
        let prepared = prepare(&job, dir, ExecConfig::default())?;
        Ok(prepared.execute()?.0)
    }

    #[test]
    fn parses_each_step_kind() {
        let job = parse_job("inputs: [a.csv]\nop: project\nfields: [x, y]\n").unwrap();
        assert!(matches!(job.step, Step::Project { ref fields } if fields.len() == 2));

        let job = parse_job("inputs: [a.csv, b.csv]\nop: join\nleft: k\nright: k\n").unwrap();
        match job.step {
            Step::Join { op, .. } => assert_eq!(op, "=="),
            other => panic!("unexpected step {other:?}"),
        }

        assert!(parse_job("inputs: []\nop: sort\n").is_err());
    }

    #[test]
    fn filter_job() {
        let dir = fixtures();
        let out = run(
            dir.path(),
            "inputs: [people.csv]\nop: filter\npredicates: [\"salary >= 50\", \"dept == eng\"]\n",
        )
        .unwrap();
        assert_eq!(
            out.records(),
            &[
                record![1i64, "ann", "eng", 100i64],
                record![3i64, "cy", "eng", 50i64]
            ]
        );
    }

    #[test]
    fn aggregate_job_with_config_override() {
        let dir = fixtures();
        let out = run(
            dir.path(),
            "inputs: [people.csv]\nop: aggregate\nfield: salary\nfunc: sum\nconfig:\n  result_policy: legacy\n",
        )
        .unwrap();
        assert_eq!(out.records(), &[record![190i64]]);
    }

    #[test]
    fn join_job() {
        let dir = fixtures();
        let out = run(
            dir.path(),
            "inputs: [people.csv, teams.csv]\nop: join\nleft: dept\nright: dept\n",
        )
        .unwrap();
        // ann and cy match two eng rows each; bob matches one ops row.
        assert_eq!(out.len(), 5);
        let names: Vec<_> = out.schema().names().collect();
        assert_eq!(names, vec!["id", "name", "dept", "salary", "floor"]);
    }

    #[test]
    fn unknown_function_is_unsupported() {
        let dir = fixtures();
        let err = run(
            dir.path(),
            "inputs: [people.csv]\nop: aggregate\nfield: salary\nfunc: median\n",
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            JobError::Core(ref e) if e.kind() == ErrorKind::UnsupportedOperator
        ));
    }

    #[test]
    fn oversized_capacity_hint_in_job_is_config_error() {
        let dir = fixtures();
        let err = run(
            dir.path(),
            "inputs: [people.csv]\nop: aggregate\nfield: salary\nfunc: sum\nconfig:\n  hash_capacity_hint: 18446744073709551615\n",
        )
        .err()
        .unwrap();
        assert!(matches!(err, JobError::Core(ref e) if e.kind() == ErrorKind::Config));
    }

    #[test]
    fn wrong_input_count() {
        let dir = fixtures();
        let err = run(dir.path(), "inputs: [people.csv]\nop: join\nleft: dept\nright: dept\n")
            .err()
            .unwrap();
        assert!(matches!(err, JobError::Inputs { expected: 2, got: 1, .. }));
    }
}
