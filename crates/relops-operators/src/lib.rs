#![forbid(unsafe_code)]
//! relops-operators: projection, selection, grouped aggregation and join.
//!
//! Design intent:
//! - Pure and synchronous. Each call scans its input store(s) to completion on
//!   the calling thread and appends results to a caller-supplied output store.
//! - Operators never call each other; composition belongs to the caller.
//! - Hash tables (join build side, group accumulators) are owned by a single
//!   call and dropped when it returns.
//! - Failures are terminal. Rows inserted before a failure stay in the output.

pub mod plan;
pub mod traits;

pub mod aggregate;
pub mod filter;
pub mod project;

pub mod join;

pub use aggregate::{Aggregate, AggregateOp, AggregateSpec};
pub use filter::{Filter, FilterPredicate};
pub use join::{Join, JoinPredicate};
pub use plan::OpPlan;
pub use project::Project;
pub use traits::{ExecStats, OpError, Operator};

use relops_core::store::Store;

/// Narrow each input record to `fields`, in that order.
pub fn projection<S: AsRef<str>>(
    input: &dyn Store,
    out: &mut dyn Store,
    fields: &[S],
) -> Result<ExecStats, OpError> {
    Project::new(fields).execute(&[input], out)
}

/// Emit every input record satisfying all `predicates`.
pub fn filter(
    input: &dyn Store,
    out: &mut dyn Store,
    predicates: &[FilterPredicate],
) -> Result<ExecStats, OpError> {
    Filter::new(predicates.to_vec()).execute(&[input], out)
}

/// Grouped or global aggregate of one numeric field, with default config.
pub fn aggregate(
    input: &dyn Store,
    out: &mut dyn Store,
    spec: &AggregateSpec,
) -> Result<ExecStats, OpError> {
    Aggregate::new(spec.clone()).execute(&[input], out)
}

/// Equality (hash) or inequality (nested-loop) join of `left` and `right`.
pub fn join(
    left: &dyn Store,
    right: &dyn Store,
    out: &mut dyn Store,
    predicate: &JoinPredicate,
) -> Result<ExecStats, OpError> {
    Join::new(predicate.clone()).execute(&[left, right], out)
}
