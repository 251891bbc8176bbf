//! Run state owned by the orchestrator for one invocation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::ParameterTable;
use crate::filter::{Rejection, SignificanceRecord};

/// Orchestrator stage. Transitions are strictly forward:
/// `Init → Cleaning → Iterating(1..=n) → Finalize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "stage", content = "round", rename_all = "snake_case")]
pub enum Stage {
    Init,
    Cleaning,
    Iterating(usize),
    Finalize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Init => f.write_str("init"),
            Stage::Cleaning => f.write_str("cleaning"),
            Stage::Iterating(k) => write!(f, "iterating({k})"),
            Stage::Finalize => f.write_str("finalize"),
        }
    }
}

/// Result of the cleaning stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Raw feature columns after removing the target and ignored columns.
    pub input: usize,
    pub kept: usize,
    /// Names dropped for collinearity, in visiting (name) order.
    pub dropped: Vec<String>,
}

/// Per-round counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: usize,
    /// Size of the accepted set the round expanded.
    pub accepted_before: usize,
    /// Candidate specs produced by both expansions, before any filtering.
    pub generated: usize,
    /// Specs already present in the accepted set with the same derivation.
    pub already_explored: usize,
    pub domain_rejected: usize,
    /// Constant outputs.
    #[serde(default)]
    pub degenerate_rejected: usize,
    /// Rejected by redundancy or significance screening.
    pub screened_out: usize,
    pub univariate_accepted: usize,
    pub bivariate_accepted: usize,
}

impl RoundSummary {
    pub fn accepted(&self) -> usize {
        self.univariate_accepted + self.bivariate_accepted
    }

    pub fn is_no_progress(&self) -> bool {
        self.accepted() == 0
    }

    pub fn accepted_after(&self) -> usize {
        self.accepted_before + self.accepted()
    }
}

/// Everything the orchestrator mutates during one run.
#[derive(Debug)]
pub struct RunState {
    pub stage: Stage,
    pub accepted: ParameterTable,
    pub target: Option<Vec<f64>>,
    pub significance: Option<SignificanceRecord>,
    pub cleaning: CleaningSummary,
    pub rounds: Vec<RoundSummary>,
    pub rejections: Vec<Rejection>,
}

impl RunState {
    pub fn new(features: ParameterTable, target: Option<Vec<f64>>) -> Self {
        Self {
            stage: Stage::Init,
            accepted: features,
            target,
            significance: None,
            cleaning: CleaningSummary::default(),
            rounds: Vec::new(),
            rejections: Vec::new(),
        }
    }

    /// Move to `next`, which must come after the current stage.
    pub fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "stage {next} does not follow {}", self.stage);
        self.stage = next;
    }
}
