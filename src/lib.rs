#![forbid(unsafe_code)]
//! relops: relational query operators over typed record stores.
//!
//! Facade over the workspace crates:
//! - [`relops_core`]: field values, schemas, records, the `Store` contract, errors.
//! - [`relops_operators`]: projection, selection, grouped aggregation, join.
//! - [`relops_io`]: CSV loading and NDJSON rendering.

pub use relops_core;
pub use relops_io;
pub use relops_operators;

pub use relops_core::prelude::*;
pub use relops_operators::{aggregate, filter, join, projection};
