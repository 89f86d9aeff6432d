#![forbid(unsafe_code)]
//! relops-core: field values, schemas, records, and the store contract that the
//! relational operators read from and write into.
//!
//! Nothing in here executes a query. The operators crate owns projection,
//! selection, aggregation and join; this crate only defines the typed data they
//! move around and the error taxonomy they report through.

pub mod config;
pub mod error;
pub mod prelude;
pub mod record;
pub mod schema;
pub mod store;
pub mod types;

pub use error::{Error, ErrorKind, Result};
