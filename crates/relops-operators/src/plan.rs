//! Operator planning surface: `OpPlan`.

use relops_core::prelude::Schema;
use serde::{Deserialize, Serialize};

/// Operator plan: output schema plus the fields an operator hashes on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpPlan {
    pub output_schema: Schema,

    /// Fields keying the call's hash table (join build key, group key).
    pub hash_keys: Vec<String>,
}

impl OpPlan {
    pub fn new(output_schema: Schema) -> Self {
        Self {
            output_schema,
            hash_keys: vec![],
        }
    }

    pub fn with_hash_keys(mut self, cols: Vec<String>) -> Self {
        self.hash_keys = cols;
        self
    }
}
