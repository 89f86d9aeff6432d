#![forbid(unsafe_code)]
//! relops-io: load typed stores from CSV and render stores as NDJSON.
//!
//! The operators never touch files; these adapters sit at the edge for the CLI
//! and for tests that want fixtures on disk.

pub mod error;
pub mod readers;
pub mod writers;

pub use error::{Error, Result};
pub use readers::csv::CsvReader;
pub use writers::jsonl::JsonlWriter;
