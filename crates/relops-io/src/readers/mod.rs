//! Readers that materialize a whole file into a `MemStore`.

pub mod csv;
