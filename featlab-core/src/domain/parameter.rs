//! Parameter: a named feature column with provenance.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::operators::{CandidateSpec, Operator};

/// Where a parameter came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Provenance {
    /// Loaded from the input table.
    Raw,
    /// Produced by an operator in expansion round `round` (1-based).
    Derived {
        operator: Operator,
        parents: Vec<String>,
        round: usize,
    },
}

impl Provenance {
    pub fn is_raw(&self) -> bool {
        matches!(self, Provenance::Raw)
    }

    /// Round in which the parameter entered the accepted set (0 for raw).
    pub fn round(&self) -> usize {
        match self {
            Provenance::Raw => 0,
            Provenance::Derived { round, .. } => *round,
        }
    }

    pub fn parents(&self) -> &[String] {
        match self {
            Provenance::Raw => &[],
            Provenance::Derived { parents, .. } => parents,
        }
    }

    /// True if this provenance records the same operator applied to the same
    /// parents as `spec`, regardless of round.
    pub fn matches(&self, spec: &CandidateSpec) -> bool {
        match self {
            Provenance::Raw => false,
            Provenance::Derived {
                operator, parents, ..
            } => *operator == spec.operator() && parents.as_slice() == spec.parents(),
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Raw => f.write_str("raw"),
            Provenance::Derived {
                operator,
                parents,
                round,
            } => write!(f, "{operator}({}) @ round {round}", parents.join(", ")),
        }
    }
}

/// A named column of sample values.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub values: Vec<f64>,
    pub provenance: Provenance,
}

impl Parameter {
    pub fn raw(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
            provenance: Provenance::Raw,
        }
    }

    /// Build an accepted candidate from its spec.
    pub fn derived(spec: &CandidateSpec, values: Vec<f64>, round: usize) -> Self {
        Self {
            name: spec.name(),
            values,
            provenance: Provenance::Derived {
                operator: spec.operator(),
                parents: spec.parents().to_vec(),
                round,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
