//! Writers that render a store's records.

pub mod jsonl;
