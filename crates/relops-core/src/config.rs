//! Execution configuration that downstream crates can serialize/deserialize.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Numeric result typing for aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultPolicy {
    /// SUM/AVG/MIN/MAX emit `F64`, COUNT emits `I64`. Nothing is truncated.
    #[default]
    Float,
    /// Ungrouped SUM/MIN/MAX truncate toward zero into `I64`; grouped results
    /// are all `F64`, COUNT included.
    Legacy,
}

impl FromStr for ResultPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "float" => Ok(ResultPolicy::Float),
            "legacy" => Ok(ResultPolicy::Legacy),
            other => Err(Error::Config(format!("unknown result policy '{other}'"))),
        }
    }
}

/// Largest accepted `hash_capacity_hint`. Maps still grow past it on demand.
pub const MAX_HASH_CAPACITY_HINT: usize = 1 << 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecConfig {
    /// How aggregate results are typed.
    pub result_policy: ResultPolicy,

    /// Initial capacity for the join build map and the aggregation group map.
    /// Read it through [`ExecConfig::capacity_hint`].
    pub hash_capacity_hint: usize,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            result_policy: ResultPolicy::Float,
            hash_capacity_hint: 64,
        }
    }
}

impl ExecConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `RELOPS_RESULT_POLICY`: `float` or `legacy`
    /// - `RELOPS_HASH_CAPACITY_HINT`: initial hash map capacity
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(s) = lookup("RELOPS_RESULT_POLICY") {
            cfg.result_policy = s.parse()?;
        }

        if let Some(s) = lookup("RELOPS_HASH_CAPACITY_HINT") {
            let hint = s.trim().parse::<usize>().map_err(|e| {
                Error::Config(format!("RELOPS_HASH_CAPACITY_HINT '{s}': {e}"))
            })?;
            cfg.set_hash_capacity_hint(hint)?;
        }

        Ok(cfg)
    }

    /// Set the hint, rejecting values above [`MAX_HASH_CAPACITY_HINT`].
    pub fn set_hash_capacity_hint(&mut self, hint: usize) -> Result<()> {
        if hint > MAX_HASH_CAPACITY_HINT {
            return Err(Error::Config(format!(
                "hash capacity hint {hint} exceeds {MAX_HASH_CAPACITY_HINT}"
            )));
        }
        self.hash_capacity_hint = hint;
        Ok(())
    }

    /// Pre-allocation size for per-call hash maps, clamped to
    /// [`MAX_HASH_CAPACITY_HINT`] since the field is public.
    pub fn capacity_hint(&self) -> usize {
        self.hash_capacity_hint.min(MAX_HASH_CAPACITY_HINT)
    }
}
