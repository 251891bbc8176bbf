//! Expansion configuration.
//!
//! One immutable value per run. Every field has a default so a partial TOML
//! table (or an empty one) deserializes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Above this many rounds the `O(m²)` bivariate growth is rarely tractable.
pub const RECOMMENDED_MAX_ITERATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Association at or above this value marks two columns as redundant.
    pub colinearity_cutoff: f64,

    /// Number of expansion rounds. 0 returns the cleaned input.
    pub iterations: usize,

    /// Gate candidates on permutation-test significance instead of redundancy.
    pub evaluate_significance: bool,

    /// Target column, excluded from expansion.
    pub target_name: Option<String>,

    /// Columns dropped before cleaning.
    pub ignored_names: BTreeSet<String>,

    /// Seed handed to the significance scorer.
    pub seed: u64,

    /// Worker threads for candidate evaluation. `None` uses the global rayon pool.
    pub threads: Option<usize>,

    /// Abort if an accepted set larger than this is about to be expanded.
    pub max_accepted: Option<usize>,

    /// Keep a per-candidate rejection log in the outcome.
    pub record_rejections: bool,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            colinearity_cutoff: 0.7,
            iterations: 2,
            evaluate_significance: false,
            target_name: None,
            ignored_names: BTreeSet::new(),
            seed: 42,
            threads: None,
            max_accepted: None,
            record_rejections: false,
        }
    }
}

impl ExpansionConfig {
    /// Check value ranges. Column references are checked against the input
    /// table when the run starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.colinearity_cutoff) {
            return Err(ConfigError::CutoffOutOfRange(self.colinearity_cutoff));
        }
        if self.evaluate_significance && self.target_name.is_none() {
            return Err(ConfigError::MissingTarget);
        }
        if self.threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        if self.max_accepted == Some(0) {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}
